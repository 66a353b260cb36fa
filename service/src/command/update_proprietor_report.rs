//! [`Command`] for changing a [`Report`] before it's sent.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        manager, property,
        proprietor::{report, Report},
        user, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a manager of a [`Property`] to change an unsent
/// [`Report`] about it.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct UpdateProprietorReport {
    /// ID of the [`Report`] to change.
    pub report_id: report::Id,

    /// New [`report::Title`], if it should be changed.
    pub title: Option<report::Title>,

    /// New [`report::Description`], if it should be changed.
    ///
    /// `Some(None)` removes the current one.
    pub description: Option<Option<report::Description>>,

    /// New [`report::Status`], if it should be changed.
    pub status: Option<report::Status>,

    /// ID of the [`User`] changing the [`Report`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateProprietorReport> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Report>, report::Id>>,
            Ok = Option<Report>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Report>, report::Id>>,
            Ok = Option<Report>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Report, report::Id>>, Err = Traced<database::Error>>
        + Database<Update<Report>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Report;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProprietorReport,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProprietorReport {
            report_id,
            title,
            description,
            status,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let property_id = self
            .database()
            .execute(Select(By::<Option<Report>, _>::new(report_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReportNotExists(report_id))
            .map_err(tracerr::wrap!())?
            .property_id;
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

        // Avoid changing a `Report` being sent.
        tx.execute(Lock(By::<Report, _>::new(report_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut report = tx
            .execute(Select(By::<Option<Report>, _>::new(report_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReportNotExists(report_id))
            .map_err(tracerr::wrap!())?;
        report
            .change(title, description, status, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(report.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(report)
    }
}

/// Error of [`UpdateProprietorReport`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Report`] cannot be changed this way.
    #[display("Cannot change `Report`: {_0}")]
    #[from]
    Change(report::ChangeError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Report`] with the provided ID does not exist.
    #[display("`Report(id: {_0})` does not exist")]
    ReportNotExists(#[error(not(source))] report::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Report`]'s property.
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{
            proprietor::report::{self, ChangeError},
            user,
        },
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{ExecutionError, UpdateProprietorReport};

    #[test]
    fn manager_approves_draft() {
        let property = fixture::property();
        let manager = fixture::user(user::Role::PropertyManager);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let draft = fixture::report(proprietor.id, property.id, &manager);
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), owner],
            manager_assignments: vec![fixture::manages(&manager, property.id)],
            reports: vec![draft.clone()],
            ..Rows::default()
        })
        .into_service();

        let updated = block_on(svc.execute(UpdateProprietorReport {
            report_id: draft.id,
            title: None,
            description: Some(report::Description::new("All units let.")),
            status: Some(report::Status::Approved),
            initiator_id: manager.id,
        }))
        .unwrap();

        assert_eq!(updated.status, report::Status::Approved);
        assert!(updated.description.is_some());
        assert_eq!(
            svc.database().rows().reports[0].status,
            report::Status::Approved,
        );
    }

    #[test]
    fn rejects_sent_status() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let draft = fixture::report(
            fixture::proprietor(&admin).id,
            property.id,
            &admin,
        );
        let svc = Memory::new(Rows {
            users: vec![admin.clone()],
            reports: vec![draft.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(UpdateProprietorReport {
            report_id: draft.id,
            title: None,
            description: None,
            status: Some(report::Status::Sent),
            initiator_id: admin.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::Change(ChangeError::SentStatus),
        ));
        assert_eq!(
            svc.database().rows().reports[0].status,
            report::Status::Draft,
        );
    }
}
