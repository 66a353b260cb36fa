//! [`Rating`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Rating on a scale from `0` to `5` stars.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(Decimal);

impl Rating {
    /// Highest possible [`Rating`].
    pub const MAX: Self = Self(Decimal::from_parts(5, 0, 0, false, 0));

    /// Lowest possible [`Rating`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Rating`] by checking the provided value is between
    /// `0` and `5`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Self::MAX.0).contains(&val).then_some(Self(val))
    }

    /// Creates a new [`Rating`] from a whole number of stars.
    #[must_use]
    pub fn stars(stars: u8) -> Option<Self> {
        Self::new(Decimal::from(stars))
    }

    /// Returns the [`Decimal`] value of this [`Rating`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Adds a new `rating` to this average [`Rating`] computed over `count`
    /// ratings.
    ///
    /// The result is rounded to two decimal places.
    #[must_use]
    pub fn with_added(self, count: u32, rating: Self) -> Self {
        let total = self.0 * Decimal::from(count) + rating.0;
        let avg = total / Decimal::from(count.saturating_add(1));
        // Average of values within bounds stays within bounds.
        Self(avg.round_dp(2).clamp(Decimal::ZERO, Self::MAX.0))
    }

    /// Calculates the average of the provided [`Rating`]s, rounded to one
    /// decimal place.
    ///
    /// [`None`] is returned if there are no [`Rating`]s.
    #[must_use]
    pub fn average(ratings: impl IntoIterator<Item = Self>) -> Option<Self> {
        let (sum, count) = ratings
            .into_iter()
            .fold((Decimal::ZERO, 0u32), |(sum, n), r| (sum + r.0, n + 1));
        (count > 0).then(|| Self((sum / Decimal::from(count)).round_dp(1)))
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid rating value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Rating from `0` to `5` stars, possibly fractional.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Rating = super::Rating;

    impl Rating {
        fn to_output<S: ScalarValue>(r: &Rating) -> Value<S> {
            Value::scalar(r.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Rating` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Rating` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Rating;

    fn rating(s: &str) -> Rating {
        s.parse().unwrap()
    }

    #[test]
    fn bounds() {
        assert!(Rating::stars(0).is_some());
        assert!(Rating::stars(5).is_some());
        assert!(Rating::stars(6).is_none());
        assert!(Rating::new(Decimal::NEGATIVE_ONE).is_none());
        assert!("5.01".parse::<Rating>().is_err());
    }

    #[test]
    fn running_average() {
        let first = Rating::ZERO.with_added(0, rating("4"));
        assert_eq!(first, rating("4"));

        let second = first.with_added(1, rating("5"));
        assert_eq!(second, rating("4.5"));

        let third = second.with_added(2, rating("3"));
        assert_eq!(third, rating("4"));

        assert_eq!(rating("4.5").with_added(2, rating("1")), rating("3.33"));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(Rating::average([]), None);
        assert_eq!(
            Rating::average([rating("4"), rating("5"), rating("5")]),
            Some(rating("4.7")),
        );
        assert_eq!(Rating::average([rating("3")]), Some(rating("3")));
    }
}
