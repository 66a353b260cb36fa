//! [`Command`] for assigning a [`Property`] share to a [`Proprietor`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        property,
        proprietor::{self, ownership, Ownership},
        user, Property, Proprietor, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a super-admin to give a share of a [`Property`] to a
/// [`Proprietor`].
///
/// Assigning a [`Property`] to its current owner changes the owned share.
#[derive(Clone, Copy, Debug)]
pub struct AssignPropertyOwnership {
    /// ID of the owning [`Proprietor`].
    pub proprietor_id: proprietor::Id,

    /// ID of the owned [`Property`].
    pub property_id: property::Id,

    /// Owned share of the [`Property`], the whole one if [`None`].
    pub percentage: Option<Percent>,

    /// ID of the super-admin [`User`] assigning the [`Ownership`].
    pub initiator_id: user::Id,
}

impl<Db> Command<AssignPropertyOwnership> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proprietor>, proprietor::Id>>,
            Ok = Option<Proprietor>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Active<Ownership>>, property::Id>>,
            Ok = Vec<Active<Ownership>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Ownership>, Err = Traced<database::Error>>
        + Database<Update<Ownership>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Ownership;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignPropertyOwnership,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignPropertyOwnership {
            proprietor_id,
            property_id,
            percentage,
            initiator_id,
        } = cmd;
        let share = percentage.unwrap_or(Percent::ONE_HUNDRED);
        if share == Percent::ZERO {
            return Err(tracerr::new!(E::ZeroShare));
        }

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
            .filter(|p| p.status == proprietor::Status::Active)
            .ok_or(E::ProprietorNotExists(proprietor_id))
            .map_err(tracerr::wrap!())?;

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

        _ = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let ownerships = tx
            .execute(Select(By::<Vec<Active<Ownership>>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        ownership::check_share(
            ownerships.iter().map(|Active(o)| o),
            proprietor_id,
            share,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let current = ownerships
            .into_iter()
            .map(|Active(o)| o)
            .find(|o| o.proprietor_id == proprietor_id);
        let ownership = if let Some(mut ownership) = current {
            ownership.percentage = share;
            ownership.assigned_at = now.coerce();
            tx.execute(Update(ownership.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            ownership
        } else {
            let ownership = Ownership {
                id: ownership::Id::new(),
                proprietor_id,
                property_id,
                percentage: share,
                is_active: true,
                assigned_at: now.coerce(),
            };
            tx.execute(Insert(ownership.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            ownership
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(ownership)
    }
}

/// Error of [`AssignPropertyOwnership`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Share doesn't fit into the [`Property`].
    #[display("Cannot own `Property`: {_0}")]
    #[from]
    Overowned(ownership::OverownedError),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Proprietor`] with the provided ID does not exist or is inactive.
    #[display("`Proprietor(id: {_0})` does not exist")]
    ProprietorNotExists(#[error(not(source))] proprietor::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),

    /// Zero share of a [`Property`] is requested.
    #[display("`Ownership` share must be positive")]
    ZeroShare,
}
