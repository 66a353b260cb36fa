//! Security [`Deposit`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{lease, property, tenant, unit as rental};
#[cfg(doc)]
use crate::domain::{Lease, Tenant};

/// Security deposit held for a [`Tenant`] during a [`Lease`].
#[derive(Clone, Debug)]
pub struct Deposit {
    /// ID of this [`Deposit`].
    pub id: Id,

    /// ID of the [`Tenant`] who paid this [`Deposit`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Lease`] this [`Deposit`] secures.
    pub lease_id: lease::Id,

    /// ID of the [`Property`] holding this [`Deposit`].
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// ID of the [`Unit`] this [`Deposit`] is paid for.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub unit_id: rental::Id,

    /// Amount of this [`Deposit`].
    pub amount: Money,

    /// [`Status`] of this [`Deposit`].
    pub status: Status,

    /// Amount refunded to the [`Tenant`], if released.
    pub refund_amount: Option<Money>,

    /// [`Reason`] of the refund amount, if any.
    pub refund_reason: Option<Reason>,

    /// [`DateTime`] when this [`Deposit`] was collected.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Deposit`] was released, if it was.
    pub released_at: Option<ReleaseDateTime>,
}

impl Deposit {
    /// Releases this [`Deposit`] refunding the provided amount to the
    /// [`Tenant`].
    ///
    /// The resulting [`Status`] is:
    /// - [`Status::Released`] when the whole amount is refunded;
    /// - [`Status::PartiallyReleased`] when a part of it is refunded;
    /// - [`Status::Forfeited`] when nothing is refunded.
    ///
    /// # Errors
    ///
    /// - If this [`Deposit`] is not [`Status::Held`].
    /// - If the `refund` is negative, exceeds the held amount or is in
    ///   another currency.
    pub fn release(
        &mut self,
        refund: Money,
        reason: Option<Reason>,
        now: DateTime,
    ) -> Result<Status, ReleaseError> {
        use ReleaseError as E;

        if self.status != Status::Held {
            return Err(E::NotHeld);
        }
        if refund.currency != self.amount.currency {
            return Err(E::CurrencyMismatch);
        }
        if refund.amount < Decimal::ZERO {
            return Err(E::NegativeRefund);
        }
        if refund.amount > self.amount.amount {
            return Err(E::RefundExceedsAmount);
        }

        self.status = if refund.amount == self.amount.amount {
            Status::Released
        } else if refund.amount.is_zero() {
            Status::Forfeited
        } else {
            Status::PartiallyReleased
        };
        self.refund_amount = Some(refund);
        self.refund_reason = reason;
        self.released_at = Some(now.coerce());
        Ok(self.status)
    }
}

/// Error of [`Deposit::release()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ReleaseError {
    /// Refund is in another currency than the [`Deposit`].
    #[display("currency differs from the deposited one")]
    CurrencyMismatch,

    /// Refund amount is negative.
    #[display("refund must not be negative")]
    NegativeRefund,

    /// [`Deposit`] is not held anymore.
    #[display("deposit is released already")]
    NotHeld,

    /// Refund is bigger than the [`Deposit`].
    #[display("refund exceeds the deposited amount")]
    RefundExceedsAmount,
}

/// ID of a [`Deposit`].
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

/// Reason of withholding (a part of) a [`Deposit`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Reason`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Reason`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 2048
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

define_kind! {
    #[doc = "Status of a [`Deposit`]."]
    enum Status {
        #[doc = "Held by the property."]
        Held = 1,

        #[doc = "Refunded in part."]
        PartiallyReleased = 2,

        #[doc = "Refunded in full."]
        Released = 3,

        #[doc = "Withheld in full."]
        Forfeited = 4,
    }
}

/// Marker type describing a [`Deposit`] release.
#[derive(Clone, Copy, Debug)]
pub struct Release;

/// [`DateTime`] when a [`Deposit`] was collected.
pub type CreationDateTime = DateTimeOf<(Deposit, unit::Creation)>;

/// [`DateTime`] when a [`Deposit`] was released.
pub type ReleaseDateTime = DateTimeOf<(Deposit, Release)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};

    use crate::domain::{lease, property, tenant, unit};

    use super::{Deposit, Id, ReleaseError, Status};

    fn kes(amount: i64) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Kes,
        }
    }

    fn deposit(amount: i64) -> Deposit {
        Deposit {
            id: Id::new(),
            tenant_id: tenant::Id::new(),
            lease_id: lease::Id::new(),
            property_id: property::Id::new(),
            unit_id: unit::Id::new(),
            amount: kes(amount),
            status: Status::Held,
            refund_amount: None,
            refund_reason: None,
            created_at: DateTime::now().coerce(),
            released_at: None,
        }
    }

    #[test]
    fn status_depends_on_refund() {
        let mut full = deposit(30_000);
        assert_eq!(
            full.release(kes(30_000), None, DateTime::now()),
            Ok(Status::Released),
        );
        assert!(full.released_at.is_some());

        let mut part = deposit(30_000);
        assert_eq!(
            part.release(kes(12_500), None, DateTime::now()),
            Ok(Status::PartiallyReleased),
        );
        assert_eq!(part.refund_amount, Some(kes(12_500)));

        let mut none = deposit(30_000);
        assert_eq!(
            none.release(kes(0), None, DateTime::now()),
            Ok(Status::Forfeited),
        );
    }

    #[test]
    fn rejects_invalid_refunds() {
        let mut d = deposit(30_000);

        assert_eq!(
            d.release(kes(30_001), None, DateTime::now()),
            Err(ReleaseError::RefundExceedsAmount),
        );
        assert_eq!(
            d.release(kes(-1), None, DateTime::now()),
            Err(ReleaseError::NegativeRefund),
        );
        assert_eq!(
            d.release(
                Money {
                    amount: 10.into(),
                    currency: Currency::Usd,
                },
                None,
                DateTime::now(),
            ),
            Err(ReleaseError::CurrencyMismatch),
        );
        assert_eq!(d.status, Status::Held);
    }

    #[test]
    fn releases_only_once() {
        let mut d = deposit(30_000);
        d.release(kes(30_000), None, DateTime::now()).unwrap();

        assert_eq!(
            d.release(kes(0), None, DateTime::now()),
            Err(ReleaseError::NotHeld),
        );
    }
}
