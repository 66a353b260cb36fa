//! [`Command`] for releasing a security [`Deposit`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deposit, manager, property, user, Deposit, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for releasing a held [`Deposit`], refunding the provided
/// amount to the tenant.
#[derive(Clone, Debug)]
pub struct ReleaseSecurityDeposit {
    /// ID of the [`Deposit`] to release.
    pub deposit_id: deposit::Id,

    /// Amount refunded to the tenant.
    pub refund: Money,

    /// [`deposit::Reason`] of withholding a part of the [`Deposit`].
    pub reason: Option<deposit::Reason>,

    /// ID of the [`User`] releasing the [`Deposit`].
    pub initiator_id: user::Id,
}

impl<Db> Command<ReleaseSecurityDeposit> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Deposit>, deposit::Id>>,
            Ok = Option<Deposit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Deposit>, deposit::Id>>,
            Ok = Option<Deposit>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Deposit, deposit::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Deposit>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Deposit;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReleaseSecurityDeposit,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReleaseSecurityDeposit {
            deposit_id,
            refund,
            reason,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let deposit = self
            .database()
            .execute(Select(By::<Option<Deposit>, _>::new(deposit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DepositNotExists(deposit_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, deposit.property_id)
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

        // Avoid concurrent actions upon the same `Deposit`.
        tx.execute(Lock(By::new(deposit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut deposit = tx
            .execute(Select(By::<Option<Deposit>, _>::new(deposit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DepositNotExists(deposit_id))
            .map_err(tracerr::wrap!())?;
        _ = deposit
            .release(refund, reason, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(deposit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(deposit)
    }
}

/// Error of [`ReleaseSecurityDeposit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Deposit`] with the provided ID does not exist.
    #[display("`Deposit(id: {_0})` does not exist")]
    DepositNotExists(#[error(not(source))] deposit::Id),

    /// [`Deposit`] cannot be released with the provided refund.
    #[display("Cannot release deposit: {_0}")]
    #[from]
    Invalid(deposit::ReleaseError),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Deposit`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
