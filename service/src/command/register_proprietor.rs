//! [`Command`] for registering a [`Proprietor`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{proprietor, user, Proprietor, User},
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a super-admin to register a proprietor [`User`] as a
/// [`Proprietor`].
#[derive(Clone, Debug)]
pub struct RegisterProprietor {
    /// ID of the proprietor [`User`].
    pub user_id: user::Id,

    /// Name of the [`Proprietor`]'s business, if any.
    pub business_name: Option<proprietor::BusinessName>,

    /// Registration number of the [`Proprietor`]'s business, if any.
    pub registration_number: Option<proprietor::RegistrationNumber>,

    /// ID of the super-admin [`User`] registering the [`Proprietor`].
    pub initiator_id: user::Id,
}

impl<Db> Command<RegisterProprietor> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proprietor>, user::Id>>,
            Ok = Option<Proprietor>,
            Err = Traced<database::Error>,
        > + Database<Insert<Proprietor>, Err = Traced<database::Error>>,
{
    type Ok = Proprietor;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterProprietor,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterProprietor {
            user_id,
            business_name,
            registration_number,
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

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;
        if user.role != user::Role::Proprietor {
            return Err(tracerr::new!(E::UserNotProprietor(user_id)));
        }

        let registered = self
            .database()
            .execute(Select(By::<Option<Proprietor>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if registered.is_some() {
            return Err(tracerr::new!(E::AlreadyRegistered(user_id)));
        }

        let proprietor = Proprietor {
            id: proprietor::Id::new(),
            user_id,
            business_name,
            registration_number,
            status: proprietor::Status::Active,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(proprietor.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(proprietor)
    }
}

/// Error of [`RegisterProprietor`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`User`] is registered as a [`Proprietor`] already.
    #[display("`User(id: {_0})` is a `Proprietor` already")]
    AlreadyRegistered(#[error(not(source))] user::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] doesn't have the proprietor [`user::Role`].
    #[display("`User(id: {_0})` is not a proprietor")]
    UserNotProprietor(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}
