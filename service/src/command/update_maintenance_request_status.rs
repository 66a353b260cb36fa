//! [`Command`] for progressing a [`MaintenanceRequest`].

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

/// [`Command`] for moving a [`MaintenanceRequest`] to another
/// [`maintenance::Status`].
///
/// Only the assigned [`Technician`] starts and completes the work, while
/// the reporter or the manager may cancel it. Completion is counted into
/// the [`Technician`]'s completed jobs.
#[derive(Clone, Copy, Debug)]
pub struct UpdateMaintenanceRequestStatus {
    /// ID of the [`MaintenanceRequest`] to update.
    pub request_id: maintenance::Id,

    /// New [`maintenance::Status`] of the [`MaintenanceRequest`].
    pub status: maintenance::Status,

    /// ID of the [`User`] updating the [`MaintenanceRequest`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateMaintenanceRequestStatus> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Technician>, user::Id>>,
            Ok = Option<Technician>,
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
        cmd: UpdateMaintenanceRequestStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use maintenance::Status as S;
        use ExecutionError as E;

        let UpdateMaintenanceRequestStatus {
            request_id,
            status,
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

        // `reporter_id` and `property_id` never change, so only the assigned
        // `Technician` has to be checked under the lock.
        let technician_id = if initiator.acts_as(user::Role::Technician) {
            self.database()
                .execute(Select(By::<Option<Technician>, _>::new(initiator_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .map(|t| t.id)
        } else {
            None
        };
        let manages = privilege::manages(
            self.database(),
            &initiator,
            request.property_id,
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `MaintenanceRequest`.
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
        let allowed = match status {
            S::InProgress | S::Completed => {
                technician_id.is_some() && request.technician_id == technician_id
            }
            S::Cancelled => request.reporter_id == initiator_id || manages,
            S::Pending => false,
        };
        if !allowed {
            return Err(tracerr::new!(E::UserNotAllowed(initiator_id)));
        }
        request
            .transit(status, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        if let (S::Completed, Some(id)) = (status, request.technician_id) {
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
                technician.total_jobs_completed =
                    technician.total_jobs_completed.saturating_add(1);
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

/// Error of [`UpdateMaintenanceRequestStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceRequest`] with the provided ID does not exist.
    #[display("`MaintenanceRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] maintenance::Id),

    /// Transition between [`maintenance::Status`]es is not allowed.
    #[display("Cannot update `MaintenanceRequest`: {_0}")]
    #[from]
    Status(maintenance::StatusError),

    /// [`User`] is not allowed to make this transition.
    #[display("`User(id: {_0})` is not allowed to update the status")]
    UserNotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{maintenance, technician, user},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{ExecutionError, UpdateMaintenanceRequestStatus};

    #[test]
    fn assignee_starts_work() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let worker = fixture::user(user::Role::Technician);
        let tech = fixture::technician(&worker, technician::category::Id::new());
        let request = fixture::request(&tenant, property.id, Some(tech.id));
        let svc = Memory::new(Rows {
            users: vec![tenant, worker.clone()],
            properties: vec![property],
            technicians: vec![tech],
            requests: vec![request.clone()],
            ..Rows::default()
        })
        .into_service();

        let updated = block_on(svc.execute(UpdateMaintenanceRequestStatus {
            request_id: request.id,
            status: maintenance::Status::InProgress,
            initiator_id: worker.id,
        }))
        .unwrap();

        assert_eq!(updated.status, maintenance::Status::InProgress);
        assert_eq!(
            svc.database().rows().requests[0].status,
            maintenance::Status::InProgress,
        );
    }

    #[test]
    fn rechecks_assignee_under_lock() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let worker = fixture::user(user::Role::Technician);
        let other = fixture::user(user::Role::Technician);
        let category = technician::category::Id::new();
        let tech = fixture::technician(&worker, category);
        let replacement = fixture::technician(&other, category);
        let replacement_id = replacement.id;
        let request = fixture::request(&tenant, property.id, Some(tech.id));
        let svc = Memory::new(Rows {
            users: vec![tenant, worker.clone(), other],
            properties: vec![property],
            technicians: vec![tech, replacement],
            requests: vec![request.clone()],
            on_request_lock: Some(Box::new(move |r| {
                r.technician_id = Some(replacement_id);
            })),
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(UpdateMaintenanceRequestStatus {
            request_id: request.id,
            status: maintenance::Status::InProgress,
            initiator_id: worker.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotAllowed(id) if id == worker.id,
        ));
        assert_eq!(
            svc.database().rows().requests[0].status,
            maintenance::Status::Pending,
        );
    }

    #[test]
    fn reporter_cancels() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let request = fixture::request(&tenant, property.id, None);
        let svc = Memory::new(Rows {
            users: vec![tenant.clone()],
            properties: vec![property],
            requests: vec![request.clone()],
            ..Rows::default()
        })
        .into_service();

        let updated = block_on(svc.execute(UpdateMaintenanceRequestStatus {
            request_id: request.id,
            status: maintenance::Status::Cancelled,
            initiator_id: tenant.id,
        }))
        .unwrap();

        assert_eq!(updated.status, maintenance::Status::Cancelled);
    }
}
