//! Rent [`Payment`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{lease, property, tenant, unit as rental};
#[cfg(doc)]
use crate::domain::{Lease, Tenant};

/// Rent charge of a [`Tenant`] for a single period of a [`Lease`], along with
/// the money paid against it.
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Tenant`] who owes this [`Payment`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Lease`] this [`Payment`] is charged by.
    pub lease_id: lease::Id,

    /// ID of the [`Property`] this [`Payment`] is paid to.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// ID of the [`Unit`] this [`Payment`] is paid for.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub unit_id: rental::Id,

    /// Amount to be paid.
    pub amount: Money,

    /// Amount paid so far.
    pub amount_paid: Money,

    /// [`DateTime`] this [`Payment`] is due by.
    pub due_at: DueDateTime,

    /// [`DateTime`] when this [`Payment`] was paid in full, if it was.
    pub paid_at: Option<PaidDateTime>,

    /// [`Method`] of the last received money, if any.
    pub method: Option<Method>,

    /// [`Reference`] of the last received money transaction, if any.
    pub reference: Option<Reference>,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,
}

impl Payment {
    /// Indicates whether nothing more is expected to be paid for this
    /// [`Payment`].
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.status, Status::Paid | Status::Waived)
    }

    /// Returns the amount still to be paid.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        if self.is_settled() {
            return Money::zero(self.amount.currency);
        }
        self.amount
            .checked_sub(self.amount_paid)
            .filter(Money::is_positive)
            .unwrap_or(Money::zero(self.amount.currency))
    }

    /// Indicates whether this [`Payment`] should become [`Status::Overdue`]
    /// at the provided moment.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime) -> bool {
        matches!(self.status, Status::Pending | Status::Partial)
            && self.due_at < now.coerce()
    }

    /// Records the provided `money` as paid against this [`Payment`].
    ///
    /// Fully covered [`Payment`] becomes [`Status::Paid`], otherwise it
    /// becomes [`Status::Partial`].
    ///
    /// # Errors
    ///
    /// - If this [`Payment`] is settled already.
    /// - If the `money` is not positive or in another currency.
    pub fn record(
        &mut self,
        money: Money,
        method: Method,
        reference: Option<Reference>,
        now: DateTime,
    ) -> Result<(), RecordError> {
        if self.is_settled() {
            return Err(RecordError::AlreadySettled);
        }
        if !money.is_positive() {
            return Err(RecordError::NonPositiveAmount);
        }
        self.amount_paid = self
            .amount_paid
            .checked_add(money)
            .ok_or(RecordError::CurrencyMismatch)?;
        self.method = Some(method);
        self.reference = reference;

        if self.amount_paid.amount >= self.amount.amount {
            self.status = Status::Paid;
            self.paid_at = Some(now.coerce());
        } else {
            self.status = Status::Partial;
        }
        Ok(())
    }
}

/// Error of [`Payment::record()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RecordError {
    /// [`Payment`] is paid or waived already.
    #[display("payment is settled already")]
    AlreadySettled,

    /// Paid money is in another currency than the [`Payment`].
    #[display("currency differs from the charged one")]
    CurrencyMismatch,

    /// Paid amount is zero or negative.
    #[display("amount must be positive")]
    NonPositiveAmount,
}

/// ID of a [`Payment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Reference of a money transaction (receipt number, M-Pesa code, etc).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Reference(String);

impl Reference {
    /// Creates a new [`Reference`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reference` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Creates a new [`Reference`] if the given `reference` is valid.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        Self::check(&reference).then_some(Self(reference))
    }

    /// Checks whether the given `reference` is a valid [`Reference`].
    fn check(reference: impl AsRef<str>) -> bool {
        let reference = reference.as_ref();
        reference.trim() == reference
            && !reference.is_empty()
            && reference.len() <= 128
    }
}

impl FromStr for Reference {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reference`")
    }
}

define_kind! {
    #[doc = "Method money of a [`Payment`] was received with."]
    enum Method {
        #[doc = "Cash in hand."]
        Cash = 1,

        #[doc = "Bank transfer."]
        BankTransfer = 2,

        #[doc = "Mobile money (M-Pesa, for example)."]
        MobileMoney = 3,

        #[doc = "Bank card."]
        Card = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "Nothing paid yet, not due."]
        Pending = 1,

        #[doc = "Paid in full."]
        Paid = 2,

        #[doc = "Not paid in full by its due date."]
        Overdue = 3,

        #[doc = "Paid in part."]
        Partial = 4,

        #[doc = "Forgiven by a manager."]
        Waived = 5,
    }
}

/// Marker type describing a [`Payment`] being paid in full.
#[derive(Clone, Copy, Debug)]
pub struct Settlement;

/// [`DateTime`] a [`Payment`] is due by.
pub type DueDateTime = DateTimeOf<(Payment, unit::Deadline)>;

/// [`DateTime`] when a [`Payment`] was paid in full.
pub type PaidDateTime = DateTimeOf<(Payment, Settlement)>;

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, DateTime, Money};

    use crate::domain::{lease, property, tenant, unit};

    use super::{Id, Method, Payment, RecordError, Status};

    fn kes(amount: i64) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Kes,
        }
    }

    fn payment(amount: i64) -> Payment {
        let now = DateTime::now();
        Payment {
            id: Id::new(),
            tenant_id: tenant::Id::new(),
            lease_id: lease::Id::new(),
            property_id: property::Id::new(),
            unit_id: unit::Id::new(),
            amount: kes(amount),
            amount_paid: kes(0),
            due_at: (now + Duration::from_secs(3600)).coerce(),
            paid_at: None,
            method: None,
            reference: None,
            status: Status::Pending,
            created_at: now.coerce(),
        }
    }

    #[test]
    fn partial_then_paid() {
        let mut p = payment(20_000);

        p.record(kes(5_000), Method::Cash, None, DateTime::now())
            .unwrap();
        assert_eq!(p.status, Status::Partial);
        assert_eq!(p.outstanding(), kes(15_000));
        assert!(p.paid_at.is_none());

        p.record(kes(15_000), Method::MobileMoney, None, DateTime::now())
            .unwrap();
        assert_eq!(p.status, Status::Paid);
        assert_eq!(p.outstanding(), kes(0));
        assert_eq!(p.method, Some(Method::MobileMoney));
        assert!(p.paid_at.is_some());
    }

    #[test]
    fn overpayment_settles() {
        let mut p = payment(10_000);

        p.record(kes(12_000), Method::BankTransfer, None, DateTime::now())
            .unwrap();

        assert_eq!(p.status, Status::Paid);
        assert_eq!(p.amount_paid, kes(12_000));
        assert_eq!(p.outstanding(), kes(0));
    }

    #[test]
    fn rejects_invalid_money() {
        let mut p = payment(10_000);
        let usd = Money {
            amount: 100.into(),
            currency: Currency::Usd,
        };

        assert_eq!(
            p.record(kes(0), Method::Cash, None, DateTime::now()),
            Err(RecordError::NonPositiveAmount),
        );
        assert_eq!(
            p.record(usd, Method::Cash, None, DateTime::now()),
            Err(RecordError::CurrencyMismatch),
        );
        assert_eq!(p.status, Status::Pending);
    }

    #[test]
    fn settled_accepts_nothing() {
        let mut p = payment(10_000);
        p.status = Status::Waived;

        assert_eq!(
            p.record(kes(10_000), Method::Card, None, DateTime::now()),
            Err(RecordError::AlreadySettled),
        );
        assert_eq!(p.outstanding(), kes(0));
    }

    #[test]
    fn overdue_only_when_unsettled_and_late() {
        let mut p = payment(10_000);
        let later = DateTime::now() + Duration::from_secs(7200);

        assert!(!p.is_overdue_at(DateTime::now()));
        assert!(p.is_overdue_at(later));

        p.status = Status::Partial;
        assert!(p.is_overdue_at(later));

        p.status = Status::Paid;
        assert!(!p.is_overdue_at(later));
    }
}
