//! [`Command`] for charging rent for a [`Lease`] period.

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{lease, manager, payment, property, user, Lease, Payment, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for charging a tenant rent for an active [`Lease`].
#[derive(Clone, Copy, Debug)]
pub struct CreateRentCharge {
    /// ID of the [`Lease`] to charge rent by.
    pub lease_id: lease::Id,

    /// Amount to charge.
    ///
    /// Monthly rent of the [`Lease`] is charged, if [`None`].
    pub amount: Option<Money>,

    /// [`DateTime`] the charged rent is due by.
    pub due_at: payment::DueDateTime,

    /// ID of the [`User`] charging the rent.
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateRentCharge> for Service<Db>
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
        > + Database<Insert<Payment>, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRentCharge,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRentCharge {
            lease_id,
            amount,
            due_at,
            initiator_id,
        } = cmd;

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

        let amount = amount.unwrap_or(lease.monthly_rent);
        if !amount.is_positive() {
            return Err(tracerr::new!(E::NonPositiveAmount(amount)));
        }

        let payment = Payment {
            id: payment::Id::new(),
            tenant_id: lease.tenant_id,
            lease_id,
            property_id: lease.property_id,
            unit_id: lease.unit_id,
            amount,
            amount_paid: Money::zero(amount.currency),
            due_at,
            paid_at: None,
            method: None,
            reference: None,
            status: payment::Status::Pending,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payment)
    }
}

/// Error of [`CreateRentCharge`] [`Command`] execution.
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

    /// Charged amount is zero or negative.
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
