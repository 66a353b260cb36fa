//! [`Command`] for marking a [`Message`] as read.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        proprietor::{message, Message},
        user, Proprietor, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a [`Proprietor`] to mark a received [`Message`] as read.
///
/// Marking a read [`Message`] again keeps its first reading time.
#[derive(Clone, Copy, Debug)]
pub struct MarkProprietorMessageRead {
    /// ID of the [`Message`] to mark.
    pub message_id: message::Id,

    /// ID of the proprietor [`User`] who received the [`Message`].
    pub initiator_id: user::Id,
}

impl<Db> Command<MarkProprietorMessageRead> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proprietor>, user::Id>>,
            Ok = Option<Proprietor>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Message>, message::Id>>,
            Ok = Option<Message>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Message>, message::Id>>,
            Ok = Option<Message>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Message, message::Id>>, Err = Traced<database::Error>>
        + Database<Update<Message>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Message;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkProprietorMessageRead,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkProprietorMessageRead {
            message_id,
            initiator_id,
        } = cmd;

        _ = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let proprietor = self
            .database()
            .execute(Select(By::<Option<Proprietor>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotRecipient(initiator_id))
            .map_err(tracerr::wrap!())?;
        let message = self
            .database()
            .execute(Select(By::<Option<Message>, _>::new(message_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MessageNotExists(message_id))
            .map_err(tracerr::wrap!())?;
        if message.proprietor_id != proprietor.id {
            return Err(tracerr::new!(E::UserNotRecipient(initiator_id)));
        }
        if message.is_read {
            return Ok(message);
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Message, _>::new(message_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut message = tx
            .execute(Select(By::<Option<Message>, _>::new(message_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MessageNotExists(message_id))
            .map_err(tracerr::wrap!())?;
        if message.mark_read(DateTime::now()) {
            tx.execute(Update(message.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(message)
    }
}

/// Error of [`MarkProprietorMessageRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Message`] with the provided ID does not exist.
    #[display("`Message(id: {_0})` does not exist")]
    MessageNotExists(#[error(not(source))] message::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not the [`Proprietor`] the [`Message`] was sent to.
    #[display("`User(id: {_0})` is not the recipient of the `Message`")]
    UserNotRecipient(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::user,
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{ExecutionError, MarkProprietorMessageRead};

    #[test]
    fn keeps_first_reading_time() {
        let admin = fixture::user(user::Role::SuperAdmin);
        let owner = fixture::user(user::Role::Proprietor);
        let proprietor = fixture::proprietor(&owner);
        let message = fixture::message(&admin, proprietor.id);
        let svc = Memory::new(Rows {
            users: vec![admin, owner.clone()],
            proprietors: vec![proprietor],
            messages: vec![message.clone()],
            ..Rows::default()
        })
        .into_service();
        let mark = MarkProprietorMessageRead {
            message_id: message.id,
            initiator_id: owner.id,
        };

        let first = block_on(svc.execute(mark)).unwrap();
        assert!(first.is_read);
        assert!(first.read_at.is_some());

        let second = block_on(svc.execute(mark)).unwrap();
        assert_eq!(second.read_at, first.read_at);
        assert!(svc.database().rows().messages[0].is_read);
    }

    #[test]
    fn rejects_other_proprietor() {
        let admin = fixture::user(user::Role::SuperAdmin);
        let owner = fixture::user(user::Role::Proprietor);
        let stranger = fixture::user(user::Role::Proprietor);
        let recipient = fixture::proprietor(&owner);
        let message = fixture::message(&admin, recipient.id);
        let svc = Memory::new(Rows {
            users: vec![admin, owner, stranger.clone()],
            proprietors: vec![recipient, fixture::proprietor(&stranger)],
            messages: vec![message.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(MarkProprietorMessageRead {
            message_id: message.id,
            initiator_id: stranger.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotRecipient(id) if id == stranger.id,
        ));
        assert!(!svc.database().rows().messages[0].is_read);
    }
}
