//! [`Command`] for collecting a security [`Deposit`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deposit, lease, manager, property, user, Deposit, Lease, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for collecting a security [`Deposit`] for an active
/// [`Lease`].
#[derive(Clone, Copy, Debug)]
pub struct CollectSecurityDeposit {
    /// ID of the [`Lease`] the [`Deposit`] secures.
    pub lease_id: lease::Id,

    /// Deposited amount.
    pub amount: Money,

    /// ID of the [`User`] collecting the [`Deposit`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CollectSecurityDeposit> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Lease>, lease::Id>>,
            Ok = Option<Lease>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Deposit>, Err = Traced<database::Error>>,
{
    type Ok = Deposit;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CollectSecurityDeposit,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CollectSecurityDeposit {
            lease_id,
            amount,
            initiator_id,
        } = cmd;

        if !amount.is_positive() {
            return Err(tracerr::new!(E::NonPositiveAmount(amount)));
        }

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let lease = self
            .database()
            .execute(Select(By::<Option<Lease>, _>::new(lease_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LeaseNotExists(lease_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, lease.property_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotManager(initiator_id)));
        }
        if !lease.is_active() {
            return Err(tracerr::new!(E::LeaseNotActive(lease_id)));
        }

        let deposit = Deposit {
            id: deposit::Id::new(),
            tenant_id: lease.tenant_id,
            lease_id,
            property_id: lease.property_id,
            unit_id: lease.unit_id,
            amount,
            status: deposit::Status::Held,
            refund_amount: None,
            refund_reason: None,
            created_at: DateTime::now().coerce(),
            released_at: None,
        };
        self.database()
            .execute(Insert(deposit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(deposit)
    }
}

/// Error of [`CollectSecurityDeposit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Lease`] is not [`lease::Status::Active`].
    #[display("`Lease(id: {_0})` is not active")]
    LeaseNotActive(#[error(not(source))] lease::Id),

    /// [`Lease`] with the provided ID does not exist.
    #[display("`Lease(id: {_0})` does not exist")]
    LeaseNotExists(#[error(not(source))] lease::Id),

    /// Deposited amount is zero or negative.
    #[display("Amount `{_0}` is not positive")]
    NonPositiveAmount(#[error(not(source))] Money),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Lease`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
