//! [`Command`] for escalating a [`MaintenanceRequest`] to its property
//! manager.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        maintenance, manager, property, user, MaintenanceRequest, Technician,
        User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for escalating a [`MaintenanceRequest`] to its property
/// manager, returning it to [`maintenance::Status::Pending`].
///
/// May be initiated by the assigned [`Technician`] or the manager.
#[derive(Clone, Debug)]
pub struct EscalateMaintenanceRequest {
    /// ID of the [`MaintenanceRequest`] to escalate.
    pub request_id: maintenance::Id,

    /// [`maintenance::Reason`] of the escalation.
    pub reason: Option<maintenance::Reason>,

    /// ID of the [`User`] escalating the [`MaintenanceRequest`].
    pub initiator_id: user::Id,
}

impl<Db> Command<EscalateMaintenanceRequest> for Service<Db>
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
            Lock<By<MaintenanceRequest, maintenance::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<MaintenanceRequest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: EscalateMaintenanceRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let EscalateMaintenanceRequest {
            request_id,
            reason,
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

        // `property_id` never changes, so only the assigned `Technician` has
        // to be checked under the lock.
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
        if technician_id.is_none() && !manages {
            return Err(tracerr::new!(E::UserNotAllowed(initiator_id)));
        }

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
        let is_assignee =
            technician_id.is_some() && request.technician_id == technician_id;
        if !is_assignee && !manages {
            return Err(tracerr::new!(E::UserNotAllowed(initiator_id)));
        }
        request
            .escalate(reason, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

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

/// Error of [`EscalateMaintenanceRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceRequest`] with the provided ID does not exist.
    #[display("`MaintenanceRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] maintenance::Id),

    /// [`MaintenanceRequest`] is not open anymore.
    #[display("Cannot escalate `MaintenanceRequest`: {_0}")]
    #[from]
    Status(maintenance::StatusError),

    /// [`User`] is neither the assignee nor a manager of the
    /// [`MaintenanceRequest`].
    #[display("`User(id: {_0})` is not allowed to escalate")]
    UserNotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{technician, user},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{EscalateMaintenanceRequest, ExecutionError};

    #[test]
    fn assignee_escalates() {
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

        let escalated = block_on(svc.execute(EscalateMaintenanceRequest {
            request_id: request.id,
            reason: None,
            initiator_id: worker.id,
        }))
        .unwrap();

        assert!(escalated.is_escalated);
        assert!(svc.database().rows().requests[0].is_escalated);
    }

    #[test]
    fn rechecks_assignee_under_lock() {
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
            on_request_lock: Some(Box::new(|r| r.technician_id = None)),
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(EscalateMaintenanceRequest {
            request_id: request.id,
            reason: None,
            initiator_id: worker.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotAllowed(id) if id == worker.id,
        ));
        assert!(!svc.database().rows().requests[0].is_escalated);
    }

    #[test]
    fn stranger_cannot_escalate() {
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

        let err = block_on(svc.execute(EscalateMaintenanceRequest {
            request_id: request.id,
            reason: None,
            initiator_id: tenant.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotAllowed(_),
        ));
    }
}
