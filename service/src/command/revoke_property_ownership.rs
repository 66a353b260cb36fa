//! [`Command`] for revoking a [`Property`] [`Ownership`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        property,
        proprietor::{ownership, Ownership},
        user, Property, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a super-admin to revoke an [`Ownership`].
///
/// The [`Ownership`] is kept deactivated.
#[derive(Clone, Copy, Debug)]
pub struct RevokePropertyOwnership {
    /// ID of the [`Ownership`] to revoke.
    pub ownership_id: ownership::Id,

    /// ID of the super-admin [`User`] revoking the [`Ownership`].
    pub initiator_id: user::Id,
}

impl<Db> Command<RevokePropertyOwnership> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Ownership>, ownership::Id>>,
            Ok = Option<Ownership>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Ownership>, ownership::Id>>,
            Ok = Option<Ownership>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Ownership>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Ownership;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevokePropertyOwnership,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevokePropertyOwnership {
            ownership_id,
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

        let property_id = self
            .database()
            .execute(Select(By::<Option<Ownership>, _>::new(ownership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OwnershipNotExists(ownership_id))
            .map_err(tracerr::wrap!())?
            .property_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent shares of the same `Property`.
        tx.execute(Lock(By::<Property, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut ownership = tx
            .execute(Select(By::<Option<Ownership>, _>::new(ownership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OwnershipNotExists(ownership_id))
            .map_err(tracerr::wrap!())?;
        if !ownership.is_active {
            return Err(tracerr::new!(E::OwnershipRevoked(ownership_id)));
        }
        ownership.is_active = false;

        tx.execute(Update(ownership.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(ownership)
    }
}

/// Error of [`RevokePropertyOwnership`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Ownership`] with the provided ID does not exist.
    #[display("`Ownership(id: {_0})` does not exist")]
    OwnershipNotExists(#[error(not(source))] ownership::Id),

    /// [`Ownership`] is revoked already.
    #[display("`Ownership(id: {_0})` is revoked already")]
    OwnershipRevoked(#[error(not(source))] ownership::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}
