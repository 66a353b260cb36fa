//! [`Payment`] and [`Deposit`] definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, Context, Error};

/// Monthly rent charge of a [`Lease`].
///
/// [`Lease`]: api::Lease
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// Monthly rent charge of a `Lease`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Lease` this `Payment` is charged for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.lease",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn lease(&self, ctx: &Context) -> Result<api::Lease, Error> {
        api::query::lease(self.0.lease_id, ctx).await
    }

    /// `Property` this `Payment` is charged at.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Payment` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Charged amount.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Amount paid so far.
    #[must_use]
    pub fn amount_paid(&self) -> Money {
        self.0.amount_paid
    }

    /// Amount left to pay.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        self.0.outstanding()
    }

    /// `DateTime` when this `Payment` is due.
    #[must_use]
    pub fn due_at(&self) -> DateTime {
        self.0.due_at.coerce()
    }

    /// `DateTime` when this `Payment` was paid in full.
    #[must_use]
    pub fn paid_at(&self) -> Option<DateTime> {
        self.0.paid_at.map(|at| at.coerce())
    }

    /// Method of the last recorded payment.
    #[must_use]
    pub fn method(&self) -> Option<Method> {
        self.0.method.map(Into::into)
    }

    /// Reference of the last recorded payment.
    #[must_use]
    pub fn reference(&self) -> Option<Reference> {
        self.0.reference.clone().map(Into::into)
    }

    /// Status of this `Payment`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Payment` was charged.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Payment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Reference of a `Payment` transaction (a receipt or a transfer number).
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentReference",
    with = scalar::Via::<domain::payment::Reference>,
)]
pub struct Reference(domain::payment::Reference);

define_enum! {
    #[doc = "Method of a `Payment`."]
    #[graphql(name = "PaymentMethod")]
    enum Method for domain::payment::Method {
        #[doc = "Cash in hand."]
        Cash,

        #[doc = "Bank transfer."]
        BankTransfer,

        #[doc = "Mobile money transfer."]
        MobileMoney,

        #[doc = "Card payment."]
        Card,
    }
}

define_enum! {
    #[doc = "Status of a `Payment`."]
    #[graphql(name = "PaymentStatus")]
    enum Status for domain::payment::Status {
        #[doc = "Charged and not paid yet."]
        Pending,

        #[doc = "Paid in full."]
        Paid,

        #[doc = "Not paid in full by its due date."]
        Overdue,

        #[doc = "Paid partially."]
        Partial,

        #[doc = "Forgiven by the manager."]
        Waived,
    }
}

/// Security deposit held for a [`Lease`].
///
/// [`Lease`]: api::Lease
#[derive(Clone, Debug, From)]
pub struct Deposit(domain::Deposit);

/// Security deposit held for a `Lease`.
#[graphql_object(context = Context)]
impl Deposit {
    /// Unique identifier of this `Deposit`.
    #[must_use]
    pub fn id(&self) -> DepositId {
        self.0.id.into()
    }

    /// `Lease` this `Deposit` is held for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Deposit.lease",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn lease(&self, ctx: &Context) -> Result<api::Lease, Error> {
        api::query::lease(self.0.lease_id, ctx).await
    }

    /// Deposited amount.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Status of this `Deposit`.
    #[must_use]
    pub fn status(&self) -> DepositStatus {
        self.0.status.into()
    }

    /// Amount refunded to the `Tenant`.
    #[must_use]
    pub fn refund_amount(&self) -> Option<Money> {
        self.0.refund_amount
    }

    /// Reason of the refund (or of its absence).
    #[must_use]
    pub fn refund_reason(&self) -> Option<DepositReason> {
        self.0.refund_reason.clone().map(Into::into)
    }

    /// `DateTime` when this `Deposit` was collected.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Deposit` was released.
    #[must_use]
    pub fn released_at(&self) -> Option<DateTime> {
        self.0.released_at.map(|at| at.coerce())
    }
}

/// Unique identifier of a `Deposit`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::deposit::Id)]
#[into(domain::deposit::Id)]
#[graphql(name = "DepositId", transparent)]
pub struct DepositId(Uuid);

/// Reason of a `Deposit` release.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DepositReason",
    with = scalar::Via::<domain::deposit::Reason>,
)]
pub struct DepositReason(domain::deposit::Reason);

define_enum! {
    #[doc = "Status of a `Deposit`."]
    #[graphql(name = "DepositStatus")]
    enum DepositStatus for domain::deposit::Status {
        #[doc = "Held by the `Property`."]
        Held,

        #[doc = "Refunded in part."]
        PartiallyReleased,

        #[doc = "Refunded in full."]
        Released,

        #[doc = "Kept in full."]
        Forfeited,
    }
}
