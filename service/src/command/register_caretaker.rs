//! [`Command`] for registering a [`Caretaker`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{caretaker, user, Caretaker, User},
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for registering a caretaker [`User`] as a [`Caretaker`].
///
/// Registered [`Caretaker`] is active and not assigned to any property.
#[derive(Clone, Copy, Debug)]
pub struct RegisterCaretaker {
    /// ID of the caretaker [`User`].
    pub user_id: user::Id,

    /// ID of the property manager [`User`] supervising the [`Caretaker`].
    ///
    /// Defaults to the initiator, if they are a property manager.
    pub manager_id: Option<user::Id>,

    /// ID of the [`User`] registering the [`Caretaker`].
    pub initiator_id: user::Id,
}

impl<Db> Command<RegisterCaretaker> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Caretaker>, user::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<Insert<Caretaker>, Err = Traced<database::Error>>,
{
    type Ok = Caretaker;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterCaretaker,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterCaretaker {
            user_id,
            mut manager_id,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if initiator.acts_as(user::Role::PropertyManager) {
            manager_id = manager_id.or(Some(initiator_id));
        } else if !initiator.is_super_admin() {
            return Err(tracerr::new!(E::UserNotAllowed(initiator_id)));
        }

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if user.role != user::Role::Caretaker {
            return Err(tracerr::new!(E::UserNotCaretaker(user_id)));
        }

        if let Some(id) = manager_id {
            let is_manager = self
                .database()
                .execute(Select(By::<Option<User>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some_and(|u| u.acts_as(user::Role::PropertyManager));
            if !is_manager {
                return Err(tracerr::new!(E::UserNotPropertyManager(id)));
            }
        }

        let registered = self
            .database()
            .execute(Select(By::<Option<Caretaker>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if registered.is_some() {
            return Err(tracerr::new!(E::AlreadyRegistered(user_id)));
        }

        let caretaker = Caretaker {
            id: caretaker::Id::new(),
            user_id,
            property_id: None,
            manager_id,
            status: caretaker::Status::Active,
            performance_rating: None,
            hired_at: DateTime::now().coerce(),
            assigned_at: None,
        };
        self.database()
            .execute(Insert(caretaker.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(caretaker)
    }
}

/// Error of [`RegisterCaretaker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`User`] is registered as a [`Caretaker`] already.
    #[display("`User(id: {_0})` is a `Caretaker` already")]
    AlreadyRegistered(#[error(not(source))] user::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is neither a super-admin nor a property manager.
    #[display("`User(id: {_0})` is not allowed to register caretakers")]
    UserNotAllowed(#[error(not(source))] user::Id),

    /// [`User`] doesn't have the caretaker [`user::Role`].
    #[display("`User(id: {_0})` is not a caretaker")]
    UserNotCaretaker(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not an active property manager.
    #[display("`User(id: {_0})` is not a property manager")]
    UserNotPropertyManager(#[error(not(source))] user::Id),
}
