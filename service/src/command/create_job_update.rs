//! [`Command`] for logging a [`Technician`]'s work upon a
//! [`MaintenanceRequest`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        maintenance, technician::job, user, MaintenanceRequest, Technician,
        User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for the assigned [`Technician`] to post a [`job::Update`] on
/// a [`MaintenanceRequest`].
///
/// Posting never changes the [`MaintenanceRequest`] itself.
#[derive(Clone, Debug)]
pub struct CreateJobUpdate {
    /// ID of the [`MaintenanceRequest`] to post the [`job::Update`] on.
    pub request_id: maintenance::Id,

    /// [`job::Status`] of the work being reported.
    pub status: job::Status,

    /// [`job::Notes`] on the work, if any.
    pub notes: Option<job::Notes>,

    /// [`job::Kind`] of the [`job::Update`].
    pub kind: job::Kind,

    /// ID of the [`User`] posting the [`job::Update`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateJobUpdate> for Service<Db>
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
        > + Database<Insert<job::Update>, Err = Traced<database::Error>>,
{
    type Ok = job::Update;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateJobUpdate,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateJobUpdate {
            request_id,
            status,
            notes,
            kind,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.acts_as(user::Role::Technician) {
            return Err(tracerr::new!(E::UserNotTechnician(initiator_id)));
        }
        let technician = self
            .database()
            .execute(Select(By::<Option<Technician>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotTechnician(initiator_id))
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
        if request.technician_id != Some(technician.id) {
            return Err(tracerr::new!(E::TechnicianNotAssigned(request_id)));
        }

        let update = job::Update {
            id: job::Id::new(),
            request_id,
            technician_id: technician.id,
            status,
            notes,
            kind,
            created_by: initiator_id,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(update.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(update)
    }
}

/// Error of [`CreateJobUpdate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceRequest`] with the provided ID does not exist.
    #[display("`MaintenanceRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] maintenance::Id),

    /// [`MaintenanceRequest`] is not assigned to the initiating
    /// [`Technician`].
    #[display("`MaintenanceRequest(id: {_0})` is assigned to someone else")]
    TechnicianNotAssigned(#[error(not(source))] maintenance::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] has no [`Technician`] profile.
    #[display("`User(id: {_0})` is not a technician")]
    UserNotTechnician(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{
            technician::{self, job},
            user,
        },
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{CreateJobUpdate, ExecutionError};

    #[test]
    fn assignee_logs_work() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let worker = fixture::user(user::Role::Technician);
        let tech = fixture::technician(&worker, technician::category::Id::new());
        let request = fixture::request(&tenant, property.id, Some(tech.id));
        let svc = Memory::new(Rows {
            users: vec![tenant, worker.clone()],
            technicians: vec![tech.clone()],
            requests: vec![request.clone()],
            ..Rows::default()
        })
        .into_service();

        let update = block_on(svc.execute(CreateJobUpdate {
            request_id: request.id,
            status: job::Status::OnHold,
            notes: job::Notes::new("Waiting for a spare valve."),
            kind: job::Kind::StatusChange,
            initiator_id: worker.id,
        }))
        .unwrap();

        assert_eq!(update.technician_id, tech.id);
        assert_eq!(update.created_by, worker.id);
        let rows = svc.database().rows();
        assert_eq!(rows.job_updates.len(), 1);
        assert_eq!(rows.requests[0].status, request.status);
    }

    #[test]
    fn rejects_other_technician() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let worker = fixture::user(user::Role::Technician);
        let other = fixture::user(user::Role::Technician);
        let category = technician::category::Id::new();
        let tech = fixture::technician(&worker, category);
        let intruder = fixture::technician(&other, category);
        let request = fixture::request(&tenant, property.id, Some(tech.id));
        let svc = Memory::new(Rows {
            users: vec![tenant, worker, other.clone()],
            technicians: vec![tech, intruder],
            requests: vec![request.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(CreateJobUpdate {
            request_id: request.id,
            status: job::Status::Completed,
            notes: None,
            kind: job::Kind::Comment,
            initiator_id: other.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::TechnicianNotAssigned(id) if id == request.id,
        ));
        assert!(svc.database().rows().job_updates.is_empty());
    }

    #[test]
    fn rejects_non_technician() {
        let tenant = fixture::user(user::Role::Tenant);
        let request = fixture::request(&tenant, fixture::property().id, None);
        let svc = Memory::new(Rows {
            users: vec![tenant.clone()],
            requests: vec![request.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(CreateJobUpdate {
            request_id: request.id,
            status: job::Status::Accepted,
            notes: None,
            kind: job::Kind::Comment,
            initiator_id: tenant.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotTechnician(id) if id == tenant.id,
        ));
    }
}
