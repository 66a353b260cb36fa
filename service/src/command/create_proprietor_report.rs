//! [`Command`] for preparing a [`Report`] for a [`Proprietor`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        manager, property,
        proprietor::{self, report, Ownership, Report},
        user, Proprietor, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a manager of a [`Property`] to draft a [`Report`] about
/// it for one of its owning [`Proprietor`]s.
#[derive(Clone, Debug)]
pub struct CreateProprietorReport {
    /// ID of the [`Proprietor`] to address the [`Report`] to.
    pub proprietor_id: proprietor::Id,

    /// ID of the [`Property`] the [`Report`] is about.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// [`report::Kind`] of the [`Report`].
    pub kind: report::Kind,

    /// [`report::Title`] of the [`Report`].
    pub title: report::Title,

    /// [`report::Description`] of the [`Report`], if any.
    pub description: Option<report::Description>,

    /// ID of the [`User`] preparing the [`Report`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateProprietorReport> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proprietor>, proprietor::Id>>,
            Ok = Option<Proprietor>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Active<Ownership>>, property::Id>>,
            Ok = Vec<Active<Ownership>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Report>, Err = Traced<database::Error>>,
{
    type Ok = Report;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProprietorReport,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProprietorReport {
            proprietor_id,
            property_id,
            kind,
            title,
            description,
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
            .execute(Select(By::<Option<Proprietor>, _>::new(proprietor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Proprietor::is_active)
            .ok_or(E::ProprietorNotExists(proprietor_id))
            .map_err(tracerr::wrap!())?;
        let owns = self
            .database()
            .execute(Select(By::<Vec<Active<Ownership>>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .iter()
            .any(|Active(o)| o.proprietor_id == proprietor_id);
        if !owns {
            return Err(tracerr::new!(E::ProprietorNotOwner(proprietor_id)));
        }

        let now = DateTime::now();
        let report = Report {
            id: report::Id::new(),
            proprietor_id,
            property_id,
            kind,
            title,
            description,
            status: report::Status::Draft,
            created_by: initiator_id,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            sent_at: None,
        };
        self.database()
            .execute(Insert(report.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(report)
    }
}

/// Error of [`CreateProprietorReport`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Proprietor`] with the provided ID does not exist or is inactive.
    #[display("`Proprietor(id: {_0})` does not exist")]
    ProprietorNotExists(#[error(not(source))] proprietor::Id),

    /// [`Proprietor`] owns no share of the [`Property`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Proprietor(id: {_0})` does not own the `Property`")]
    ProprietorNotOwner(#[error(not(source))] proprietor::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{
            property,
            proprietor::{self, report},
            user,
        },
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{CreateProprietorReport, ExecutionError};

    fn command(
        proprietor_id: proprietor::Id,
        property_id: property::Id,
        initiator_id: user::Id,
    ) -> CreateProprietorReport {
        CreateProprietorReport {
            proprietor_id,
            property_id,
            kind: report::Kind::Occupancy,
            title: report::Title::new("Occupancy, Q1").unwrap(),
            description: None,
            initiator_id,
        }
    }

    #[test]
    fn manager_drafts_report_for_owner() {
        let property = fixture::property();
        let manager = fixture::user(user::Role::PropertyManager);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), owner],
            manager_assignments: vec![fixture::manages(&manager, property.id)],
            ownerships: vec![fixture::owns(proprietor.id, property.id)],
            proprietors: vec![proprietor.clone()],
            properties: vec![property.clone()],
            ..Rows::default()
        })
        .into_service();

        let created = block_on(svc.execute(command(
            proprietor.id,
            property.id,
            manager.id,
        )))
        .unwrap();

        assert_eq!(created.status, report::Status::Draft);
        assert_eq!(created.created_by, manager.id);
        assert!(created.sent_at.is_none());
        assert_eq!(svc.database().rows().reports.len(), 1);
    }

    #[test]
    fn rejects_proprietor_not_owning_property() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), owner],
            ownerships: vec![fixture::owns(
                proprietor.id,
                fixture::property().id,
            )],
            proprietors: vec![proprietor.clone()],
            properties: vec![property.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(command(
            proprietor.id,
            property.id,
            admin.id,
        )))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::ProprietorNotOwner(id) if id == proprietor.id,
        ));
        assert!(svc.database().rows().reports.is_empty());
    }

    #[test]
    fn rejects_tenant() {
        let property = fixture::property();
        let tenant = fixture::user(user::Role::Tenant);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let svc = Memory::new(Rows {
            users: vec![tenant.clone(), owner],
            ownerships: vec![fixture::owns(proprietor.id, property.id)],
            proprietors: vec![proprietor.clone()],
            properties: vec![property.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(command(
            proprietor.id,
            property.id,
            tenant.id,
        )))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotManager(id) if id == tenant.id,
        ));
    }
}
