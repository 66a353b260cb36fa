//! Property [`Ownership`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Percent};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, proprietor};
#[cfg(doc)]
use crate::domain::{Property, Proprietor};

/// Share of a [`Property`] owned by a [`Proprietor`].
#[derive(Clone, Debug)]
pub struct Ownership {
    /// ID of this [`Ownership`].
    pub id: Id,

    /// ID of the owning [`Proprietor`].
    pub proprietor_id: proprietor::Id,

    /// ID of the owned [`Property`].
    pub property_id: property::Id,

    /// Owned share of the [`Property`].
    pub percentage: Percent,

    /// Indicator whether this [`Ownership`] is in force.
    pub is_active: bool,

    /// [`DateTime`] when this [`Ownership`] was (re)assigned.
    pub assigned_at: AssignmentDateTime,
}

/// Error of exceeding the whole [`Property`] with [`Ownership`] shares.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
#[display("only `{available}%` of the `Property` is left to own")]
pub struct OverownedError {
    /// Share of the [`Property`] not owned by anyone yet.
    pub available: Decimal,
}

/// Checks whether the provided `share` still fits into a [`Property`] along
/// with its other active [`Ownership`]s.
///
/// [`Ownership`]s of the `proprietor_id` are not counted, as the `share`
/// replaces them.
///
/// # Errors
///
/// With the share left to own, if the `share` doesn't fit.
pub fn check_share<'o>(
    ownerships: impl IntoIterator<Item = &'o Ownership>,
    proprietor_id: proprietor::Id,
    share: Percent,
) -> Result<(), OverownedError> {
    let owned: Decimal = ownerships
        .into_iter()
        .filter(|o| o.is_active && o.proprietor_id != proprietor_id)
        .map(|o| o.percentage.value())
        .sum();
    let available = (Decimal::ONE_HUNDRED - owned).max(Decimal::ZERO);
    if share.value() > available {
        return Err(OverownedError { available });
    }
    Ok(())
}

/// ID of an [`Ownership`].
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

/// [`DateTime`] when an [`Ownership`] was assigned.
pub type AssignmentDateTime = DateTimeOf<(Ownership, unit::Assignment)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Percent};
    use rust_decimal::Decimal;

    use crate::domain::{property, proprietor};

    use super::{check_share, Id, Ownership};

    fn ownership(owner: proprietor::Id, pct: u8, active: bool) -> Ownership {
        Ownership {
            id: Id::new(),
            proprietor_id: owner,
            property_id: property::Id::new(),
            percentage: Percent::new(Decimal::from(pct)).unwrap(),
            is_active: active,
            assigned_at: DateTime::now().coerce(),
        }
    }

    fn pct(v: u8) -> Percent {
        Percent::new(Decimal::from(v)).unwrap()
    }

    #[test]
    fn fits_into_remaining_share() {
        let (a, b) = (proprietor::Id::new(), proprietor::Id::new());
        let owned = [ownership(a, 60, true)];

        assert!(check_share(&owned, b, pct(40)).is_ok());
        assert_eq!(
            check_share(&owned, b, pct(41)).unwrap_err().available,
            Decimal::from(40),
        );
    }

    #[test]
    fn ignores_inactive_and_own_shares() {
        let (a, b) = (proprietor::Id::new(), proprietor::Id::new());
        let owned = [ownership(a, 100, false), ownership(b, 70, true)];

        assert!(check_share(&owned, b, Percent::default()).is_ok());
        assert!(check_share(&owned, a, pct(31)).is_err());
    }

    #[test]
    fn whole_property_by_default() {
        assert!(check_share(
            std::iter::empty(),
            proprietor::Id::new(),
            Percent::default(),
        )
        .is_ok());
    }
}
