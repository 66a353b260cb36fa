//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Adds the provided [`Money`] to this one.
    ///
    /// [`None`] is returned if currencies differ or the amount overflows.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self {
            amount: self.amount.checked_add(other.amount)?,
            currency: self.currency,
        })
    }

    /// Subtracts the provided [`Money`] from this one.
    ///
    /// [`None`] is returned if currencies differ or the amount overflows.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self {
            amount: self.amount.checked_sub(other.amount)?,
            currency: self.currency,
        })
    }

    /// Indicates whether this [`Money`] amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let at = s
            .char_indices()
            .rev()
            .nth(2)
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .ok_or("too short")?;

        let (amount, currency) = s.split_at(at);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Kenyan Shilling."]
        Kes = 1,

        #[doc = "US Dollar."]
        Usd = 2,
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Kes
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn kes(s: &str) -> Money {
        Money {
            amount: decimal(s),
            currency: Currency::Kes,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("15000.50KES").unwrap(), kes("15000.50"));
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Ke").is_err());
        assert!(Money::from_str("123.45EUR").is_err());
        assert!(Money::from_str("123.45Kenyan").is_err());

        assert!(Money::from_str("123.00KES").is_ok());
        assert!(Money::from_str("123KES").is_ok());
    }

    #[test]
    fn rejects_non_ascii_input() {
        assert!(Money::from_str("ab€x").is_err());
        assert!(Money::from_str("12€").is_err());
        assert!(Money::from_str("10KÉS").is_err());
        assert!(Money::from_str("€€€€").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(kes("123.45").to_string(), "123.45KES");
        assert_eq!(kes("25000.00").to_string(), "25000KES");
        assert_eq!(
            Money {
                amount: decimal("99.5"),
                currency: Currency::Usd,
            }
            .to_string(),
            "99.5USD",
        );
    }

    #[test]
    fn arithmetic_requires_same_currency() {
        let usd = Money {
            amount: decimal("10"),
            currency: Currency::Usd,
        };

        assert_eq!(kes("10").checked_add(kes("5.5")), Some(kes("15.5")));
        assert_eq!(kes("10").checked_sub(kes("12")), Some(kes("-2")));
        assert_eq!(kes("10").checked_add(usd), None);
        assert_eq!(kes("10").checked_sub(usd), None);

        assert!(kes("0.01").is_positive());
        assert!(!Money::zero(Currency::Kes).is_positive());
    }
}
