//! [`Command`] for assigning a [`MaintenanceRequest`] to a [`Technician`]
//! manually.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        maintenance, manager, property, technician, user, MaintenanceRequest,
        Technician, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a property manager to assign a [`MaintenanceRequest`] to
/// the chosen [`Technician`].
///
/// Clears the escalation of the [`MaintenanceRequest`].
#[derive(Clone, Copy, Debug)]
pub struct AssignMaintenanceRequest {
    /// ID of the [`MaintenanceRequest`] to assign.
    pub request_id: maintenance::Id,

    /// ID of the [`Technician`] to assign the [`MaintenanceRequest`] to.
    pub technician_id: technician::Id,

    /// [`DateTime`] the [`Technician`] should respond by.
    ///
    /// Defaults to the configured response time from now.
    pub deadline: Option<maintenance::DeadlineDateTime>,

    /// ID of the [`User`] assigning the [`MaintenanceRequest`].
    pub initiator_id: user::Id,
}

impl<Db> Command<AssignMaintenanceRequest> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MaintenanceRequest>, maintenance::Id>>,
            Ok = Option<MaintenanceRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<MaintenanceRequest>, maintenance::Id>>,
            Ok = Option<MaintenanceRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Technician>, property::Id>>,
            Ok = Vec<Technician>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<MaintenanceRequest, maintenance::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<MaintenanceRequest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignMaintenanceRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignMaintenanceRequest {
            request_id,
            technician_id,
            deadline,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let request = self
            .database()
            .execute(Select(By::<Option<MaintenanceRequest>, _>::new(
                request_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, request.property_id)
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

        // Avoid concurrent assignments of the same `MaintenanceRequest`.
        tx.execute(Lock(By::new(request_id)))
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

        let serves_property = tx
            .execute(Select(By::<Vec<Technician>, _>::new(
                request.property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .iter()
            .any(|t| {
                t.id == technician_id
                    && t.status == technician::Status::Active
            });
        if !serves_property {
            return Err(tracerr::new!(E::TechnicianNotServing(technician_id)));
        }

        let now = DateTime::now();
        request
            .assign(technician_id, self.config.maintenance_response_time, now)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if let Some(deadline) = deadline {
            request.response_deadline = Some(deadline);
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

/// Error of [`AssignMaintenanceRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceRequest`] with the provided ID does not exist.
    #[display("`MaintenanceRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] maintenance::Id),

    /// [`MaintenanceRequest`] is not [`maintenance::Status::Pending`].
    #[display("Cannot assign `MaintenanceRequest`: {_0}")]
    #[from]
    Status(maintenance::StatusError),

    /// [`Technician`] does not serve the [`Property`] of the
    /// [`MaintenanceRequest`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Technician(id: {_0})` does not serve the `Property`")]
    TechnicianNotServing(#[error(not(source))] technician::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the
    /// [`MaintenanceRequest`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
