//! [`Command`] for updating a [`Unit`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{manager, property, unit, user, Unit, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for updating rent or [`unit::Status`] of a [`Unit`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateUnit {
    /// ID of the [`Unit`] to update.
    pub unit_id: unit::Id,

    /// New monthly rent of the [`Unit`].
    pub monthly_rent: Option<Money>,

    /// New [`unit::Status`] of the [`Unit`].
    ///
    /// [`unit::Status::Occupied`] is managed by leases only.
    pub status: Option<unit::Status>,

    /// ID of the [`User`] updating the [`Unit`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateUnit> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Unit, unit::Id>>, Err = Traced<database::Error>>
        + Database<Update<Unit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Unit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUnit {
            unit_id,
            monthly_rent,
            status,
            initiator_id,
        } = cmd;

        if let Some(rent) = monthly_rent.filter(|r| !r.is_positive()) {
            return Err(tracerr::new!(E::NonPositiveRent(rent)));
        }

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, unit.property_id)
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

        // Avoid concurrent actions upon the same `Unit`.
        tx.execute(Lock(By::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut unit = tx
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        if let Some(status) = status {
            let leased = unit.status == unit::Status::Occupied;
            if leased != (status == unit::Status::Occupied) {
                return Err(tracerr::new!(E::StatusManagedByLease(unit_id)));
            }
            unit.status = status;
        }
        if let Some(rent) = monthly_rent {
            unit.monthly_rent = rent;
        }

        tx.execute(Update(unit.clone()))
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

/// Error of [`UpdateUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Monthly rent is zero or negative.
    #[display("Monthly rent `{_0}` is not positive")]
    NonPositiveRent(#[error(not(source))] Money),

    /// [`unit::Status::Occupied`] is set or cleared outside of a lease.
    #[display("`Unit(id: {_0})` occupancy is managed by leases")]
    StatusManagedByLease(#[error(not(source))] unit::Id),

    /// [`Unit`] with the provided ID does not exist.
    #[display("`Unit(id: {_0})` does not exist")]
    UnitNotExists(#[error(not(source))] unit::Id),

    /// [`User`] does not manage the [`Property`] of the [`Unit`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
