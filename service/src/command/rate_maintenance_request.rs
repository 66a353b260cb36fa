//! [`Command`] for rating the job done on a [`MaintenanceRequest`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        maintenance, technician, user, MaintenanceRequest, Technician, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for the reporter to rate a completed [`MaintenanceRequest`].
///
/// The [`Rating`] is added to the running average of the assigned
/// [`Technician`].
#[derive(Clone, Copy, Debug)]
pub struct RateMaintenanceRequest {
    /// ID of the [`MaintenanceRequest`] to rate.
    pub request_id: maintenance::Id,

    /// [`Rating`] of the job.
    pub rating: Rating,

    /// ID of the [`User`] rating the job.
    pub initiator_id: user::Id,
}

impl<Db> Command<RateMaintenanceRequest> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MaintenanceRequest>, maintenance::Id>>,
            Ok = Option<MaintenanceRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Technician>, technician::Id>>,
            Ok = Option<Technician>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<MaintenanceRequest, maintenance::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Technician, technician::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<MaintenanceRequest>, Err = Traced<database::Error>>
        + Database<Update<Technician>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RateMaintenanceRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RateMaintenanceRequest {
            request_id,
            rating,
            initiator_id,
        } = cmd;

        _ = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid rating the same `MaintenanceRequest` twice.
        tx.execute(Lock(By::<MaintenanceRequest, _>::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut request = tx
            .execute(Select(By::<Option<MaintenanceRequest>, _>::new(
                request_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?;
        if request.reporter_id != initiator_id {
            return Err(tracerr::new!(E::UserNotReporter(initiator_id)));
        }
        request.rate(rating).map_err(tracerr::from_and_wrap!(=> E))?;

        if let Some(id) = request.technician_id {
            tx.execute(Lock(By::<Technician, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            let technician = tx
                .execute(Select(By::<Option<Technician>, technician::Id>::new(
                    id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(mut technician) = technician {
                technician.rate(rating);
                tx.execute(Update(technician))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Update(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(request)
    }
}

/// Error of [`RateMaintenanceRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceRequest`] cannot be rated.
    #[display("Cannot rate `MaintenanceRequest`: {_0}")]
    #[from]
    Rate(maintenance::RateError),

    /// [`MaintenanceRequest`] with the provided ID does not exist.
    #[display("`MaintenanceRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] maintenance::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not the reporter of the [`MaintenanceRequest`].
    #[display("`User(id: {_0})` did not report the `MaintenanceRequest`")]
    UserNotReporter(#[error(not(source))] user::Id),
}
