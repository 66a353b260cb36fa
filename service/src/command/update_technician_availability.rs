//! [`Command`] for toggling availability of a [`Technician`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{technician, user, Technician, User},
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a [`Technician`] to toggle whether they take new jobs.
#[derive(Clone, Copy, Debug)]
pub struct UpdateTechnicianAvailability {
    /// Whether the [`Technician`] takes new jobs.
    pub is_available: bool,

    /// ID of the technician [`User`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateTechnicianAvailability> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Technician>, user::Id>>,
            Ok = Option<Technician>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Technician>, technician::Id>>,
            Ok = Option<Technician>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Technician, technician::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Technician>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Technician;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateTechnicianAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateTechnicianAvailability {
            is_available,
            initiator_id,
        } = cmd;

        _ = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let Technician { id, .. } = self
            .database()
            .execute(Select(By::<Option<Technician>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotTechnician(initiator_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Technician`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut technician = tx
            .execute(Select(By::<Option<Technician>, technician::Id>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotTechnician(initiator_id))
            .map_err(tracerr::wrap!())?;
        technician.is_available = is_available;

        tx.execute(Update(technician.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(technician)
    }
}

/// Error of [`UpdateTechnicianAvailability`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a registered [`Technician`].
    #[display("`User(id: {_0})` is not a `Technician`")]
    UserNotTechnician(#[error(not(source))] user::Id),
}
