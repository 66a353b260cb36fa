//! [`Command`] for creating a new [`Unit`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{manager, property, unit, user, Property, Unit, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for creating a new [`Unit`] in a [`Property`].
#[derive(Clone, Debug)]
pub struct CreateUnit {
    /// ID of the [`Property`] to create the [`Unit`] in.
    pub property_id: property::Id,

    /// [`unit::Number`] of a new [`Unit`].
    pub number: unit::Number,

    /// Monthly rent of a new [`Unit`].
    pub monthly_rent: Money,

    /// ID of the [`User`] creating the [`Unit`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateUnit> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Unit>, property::Id>>,
            Ok = Vec<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Unit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUnit {
            property_id,
            number,
            monthly_rent,
            initiator_id,
        } = cmd;

        if !monthly_rent.is_positive() {
            return Err(tracerr::new!(E::NonPositiveRent(monthly_rent)));
        }

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, property_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotManager(initiator_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent `Unit` numbering of the same `Property`.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Property::is_active)
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let units = tx
            .execute(Select(By::<Vec<Unit>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if units.iter().any(|u| u.number == number) {
            return Err(tracerr::new!(E::NumberOccupied(number)));
        }

        let unit = Unit {
            id: unit::Id::new(),
            property_id,
            number,
            monthly_rent,
            status: unit::Status::Available,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(unit)
    }
}

/// Error of [`CreateUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Monthly rent is zero or negative.
    #[display("Monthly rent `{_0}` is not positive")]
    NonPositiveRent(#[error(not(source))] Money),

    /// [`unit::Number`] is used by another [`Unit`] of the [`Property`].
    #[display("`Unit` number `{_0}` is occupied")]
    NumberOccupied(#[error(not(source))] unit::Number),

    /// [`Property`] with the provided ID does not exist or is inactive.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`User`] does not manage the [`Property`].
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
