//! [`Command`] for ensuring a super-admin [`User`] exists.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating an active super-admin [`User`], unless its
/// [`user::Email`] is taken already.
#[derive(Clone, Debug)]
pub struct EnsureSuperAdmin {
    /// [`user::Name`] of the super-admin.
    pub name: user::Name,

    /// [`user::Email`] of the super-admin.
    pub email: user::Email,

    /// [`user::Password`] of the super-admin.
    pub password: SecretBox<user::Password>,
}

/// Output of [`EnsureSuperAdmin`] [`Command`].
#[derive(Clone, Debug)]
pub enum Output {
    /// New super-admin [`User`] was created.
    Created(User),

    /// [`User`] with the same [`user::Email`] exists already.
    Existing(User),
}

impl<Db> Command<EnsureSuperAdmin> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: EnsureSuperAdmin,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let EnsureSuperAdmin {
            name,
            email,
            password,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(existing) = tx
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(Output::Existing(existing));
        }

        let user = User {
            id: user::Id::new(),
            name,
            email,
            phone: None,
            role: user::Role::SuperAdmin,
            status: user::Status::Active,
            password_hash: user::PasswordHash::new(password.expose_secret())
                .map_err(tracerr::from_and_wrap!(=> E))?,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output::Created(user))
    }
}

/// Error of [`EnsureSuperAdmin`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Failed to hash the [`user::Password`].
    #[display("Failed to hash password: {_0}")]
    PasswordHashing(user::HashingError),
}
