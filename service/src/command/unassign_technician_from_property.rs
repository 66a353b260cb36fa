//! [`Command`] for unassigning a [`Technician`] from a [`Property`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Property;
use crate::{
    domain::{manager, property, technician, user, Technician, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for unassigning a [`Technician`] from a [`Property`].
///
/// The [`technician::Assignment`] is kept deactivated.
#[derive(Clone, Copy, Debug)]
pub struct UnassignTechnicianFromProperty {
    /// ID of the [`Technician`] to unassign.
    pub technician_id: technician::Id,

    /// ID of the [`Property`] to unassign the [`Technician`] from.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the unassignment.
    pub initiator_id: user::Id,
}

impl<Db> Command<UnassignTechnicianFromProperty> for Service<Db>
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
            Update<technician::Assignment>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = technician::Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UnassignTechnicianFromProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignTechnicianFromProperty {
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

        let mut assignment = tx
            .execute(Select(By::<Option<technician::Assignment>, _>::new((
                technician_id,
                property_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|a| a.is_active)
            .ok_or(E::NotAssigned(technician_id))
            .map_err(tracerr::wrap!())?;
        assignment.is_active = false;

        tx.execute(Update(assignment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`UnassignTechnicianFromProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Technician`] is not assigned to the [`Property`].
    #[display("`Technician(id: {_0})` is not assigned to the `Property`")]
    NotAssigned(#[error(not(source))] technician::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`].
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
