//! [`Command`] for messaging a [`Proprietor`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        proprietor::{self, message, Message},
        user, Proprietor, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a super-admin to send a [`Message`] to an active
/// [`Proprietor`].
#[derive(Clone, Debug)]
pub struct SendProprietorMessage {
    /// ID of the [`Proprietor`] to send the [`Message`] to.
    pub proprietor_id: proprietor::Id,

    /// [`message::Subject`] of the [`Message`], if any.
    pub subject: Option<message::Subject>,

    /// [`message::Body`] of the [`Message`].
    pub body: message::Body,

    /// [`message::Kind`] of the [`Message`].
    pub kind: message::Kind,

    /// ID of the super-admin [`User`] sending the [`Message`].
    pub initiator_id: user::Id,
}

impl<Db> Command<SendProprietorMessage> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proprietor>, proprietor::Id>>,
            Ok = Option<Proprietor>,
            Err = Traced<database::Error>,
        > + Database<Insert<Message>, Err = Traced<database::Error>>,
{
    type Ok = Message;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SendProprietorMessage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendProprietorMessage {
            proprietor_id,
            subject,
            body,
            kind,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_super_admin() {
            return Err(tracerr::new!(E::UserNotSuperAdmin(initiator_id)));
        }

        _ = self
            .database()
            .execute(Select(By::<Option<Proprietor>, _>::new(proprietor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Proprietor::is_active)
            .ok_or(E::ProprietorNotExists(proprietor_id))
            .map_err(tracerr::wrap!())?;

        let message = Message {
            id: message::Id::new(),
            proprietor_id,
            sender_id: initiator_id,
            subject,
            body,
            kind,
            is_read: false,
            read_at: None,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(message.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(message)
    }
}

/// Error of [`SendProprietorMessage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Proprietor`] with the provided ID does not exist or is inactive.
    #[display("`Proprietor(id: {_0})` does not exist")]
    ProprietorNotExists(#[error(not(source))] proprietor::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{
            proprietor::{self, message},
            user,
        },
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{ExecutionError, SendProprietorMessage};

    fn command(
        proprietor_id: proprietor::Id,
        initiator_id: user::Id,
    ) -> SendProprietorMessage {
        SendProprietorMessage {
            proprietor_id,
            subject: None,
            body: message::Body::new("Rent for March is collected.").unwrap(),
            kind: message::Kind::General,
            initiator_id,
        }
    }

    #[test]
    fn admin_sends_unread_message() {
        let admin = fixture::user(user::Role::SuperAdmin);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), owner],
            proprietors: vec![proprietor.clone()],
            ..Rows::default()
        })
        .into_service();

        let sent = block_on(svc.execute(command(proprietor.id, admin.id)))
            .unwrap();

        assert_eq!(sent.sender_id, admin.id);
        assert!(!sent.is_read);
        assert!(sent.read_at.is_none());
        assert_eq!(svc.database().rows().messages.len(), 1);
    }

    #[test]
    fn rejects_manager() {
        let manager = fixture::user(user::Role::PropertyManager);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), owner],
            proprietors: vec![proprietor.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(command(proprietor.id, manager.id)))
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotSuperAdmin(id) if id == manager.id,
        ));
        assert!(svc.database().rows().messages.is_empty());
    }
}
