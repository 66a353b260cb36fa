//! [`Command`] for approving and sending a [`Report`] to its
//! [`Proprietor`].
//!
//! [`Proprietor`]: crate::domain::Proprietor

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

/// [`Command`] for a manager of a [`Property`] to send a [`Report`] about it,
/// freezing the [`Report`] afterwards.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Copy, Debug)]
pub struct SendProprietorReport {
    /// ID of the [`Report`] to send.
    pub report_id: report::Id,

    /// ID of the [`User`] sending the [`Report`].
    pub initiator_id: user::Id,
}

impl<Db> Command<SendProprietorReport> for Service<Db>
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
        cmd: SendProprietorReport,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendProprietorReport {
            report_id,
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

        // Avoid sending the same `Report` twice.
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
            .send(DateTime::now())
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

/// Error of [`SendProprietorReport`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Report`] is sent already.
    #[display("Cannot send `Report`: {_0}")]
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

    use super::{ExecutionError, SendProprietorReport};

    #[test]
    fn sends_once() {
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
        let send = SendProprietorReport {
            report_id: draft.id,
            initiator_id: manager.id,
        };

        let sent = block_on(svc.execute(send)).unwrap();
        assert_eq!(sent.status, report::Status::Sent);
        assert!(sent.sent_at.is_some());

        let err = block_on(svc.execute(send)).unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::Change(ChangeError::AlreadySent),
        ));
    }

    #[test]
    fn rejects_owner_sending_to_themselves() {
        let property = fixture::property();
        let manager = fixture::user(user::Role::PropertyManager);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let draft = fixture::report(proprietor.id, property.id, &manager);
        let svc = Memory::new(Rows {
            users: vec![manager, owner.clone()],
            reports: vec![draft.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(SendProprietorReport {
            report_id: draft.id,
            initiator_id: owner.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotManager(id) if id == owner.id,
        ));
        assert!(!svc.database().rows().reports[0].is_sent());
    }
}
