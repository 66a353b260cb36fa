//! [`Command`] for assigning a [`Technician`] to a [`Property`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        manager, property, technician, user, Property, Technician, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for assigning a [`Technician`] to serve a [`Property`].
///
/// Previously unassigned pair is reactivated.
#[derive(Clone, Copy, Debug)]
pub struct AssignTechnicianToProperty {
    /// ID of the [`Technician`] to assign.
    pub technician_id: technician::Id,

    /// ID of the [`Property`] to assign the [`Technician`] to.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the assignment.
    pub initiator_id: user::Id,
}

impl<Db> Command<AssignTechnicianToProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Technician>, technician::Id>>,
            Ok = Option<Technician>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Option<technician::Assignment>,
                    (technician::Id, property::Id),
                >,
            >,
            Ok = Option<technician::Assignment>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Technician, technician::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<technician::Assignment>,
            Err = Traced<database::Error>,
        > + Database<
            Update<technician::Assignment>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = technician::Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignTechnicianToProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignTechnicianToProperty {
            technician_id,
            property_id,
            initiator_id,
        } = cmd;

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
        _ = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Property::is_active)
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent assignments of the same `Technician`.
        tx.execute(Lock(By::new(technician_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Technician>, _>::new(technician_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|t| t.status == technician::Status::Active)
            .ok_or(E::TechnicianNotExists(technician_id))
            .map_err(tracerr::wrap!())?;

        let existing = tx
            .execute(Select(By::<Option<technician::Assignment>, _>::new((
                technician_id,
                property_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let assignment = match existing {
            Some(a) if a.is_active => {
                return Err(tracerr::new!(E::AlreadyAssigned(technician_id)));
            }
            Some(mut a) => {
                a.is_active = true;
                a.assigned_at = DateTime::now().coerce();
                tx.execute(Update(a.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                a
            }
            None => {
                let a = technician::Assignment {
                    id: technician::assignment::Id::new(),
                    technician_id,
                    property_id,
                    is_active: true,
                    assigned_at: DateTime::now().coerce(),
                };
                tx.execute(Insert(a.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                a
            }
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`AssignTechnicianToProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Technician`] is assigned to the [`Property`] already.
    #[display("`Technician(id: {_0})` is assigned to the `Property` already")]
    AlreadyAssigned(#[error(not(source))] technician::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist or is inactive.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Technician`] with the provided ID does not exist or is inactive.
    #[display("`Technician(id: {_0})` does not exist")]
    TechnicianNotExists(#[error(not(source))] technician::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`].
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
