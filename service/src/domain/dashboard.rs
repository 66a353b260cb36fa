//! Dashboard statistics over a set of [`Property`]s.
//!
//! [`Property`]: crate::domain::Property

use std::collections::BTreeMap;

use common::{money::Currency, DateTime, Money};
use rust_decimal::Decimal;

use crate::domain::{unit, Payment, Unit};

/// Occupancy of [`Unit`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Occupancy {
    /// Total number of [`Unit`]s.
    pub total: u32,

    /// Number of [`unit::Status::Occupied`] [`Unit`]s.
    pub occupied: u32,

    /// Number of [`unit::Status::Available`] [`Unit`]s.
    pub available: u32,

    /// Number of [`unit::Status::Maintenance`] [`Unit`]s.
    pub maintenance: u32,
}

impl Occupancy {
    /// Collects the [`Occupancy`] of the provided [`Unit`]s.
    #[must_use]
    pub fn collect<'u>(units: impl IntoIterator<Item = &'u Unit>) -> Self {
        units.into_iter().fold(Self::default(), |mut o, u| {
            o.total += 1;
            match u.status {
                unit::Status::Occupied => o.occupied += 1,
                unit::Status::Available => o.available += 1,
                unit::Status::Maintenance => o.maintenance += 1,
                unit::Status::Reserved => {}
            }
            o
        })
    }

    /// Returns the percentage of occupied [`Unit`]s rounded to two decimal
    /// places.
    ///
    /// Zero is returned if there are no [`Unit`]s at all.
    #[must_use]
    pub fn rate(&self) -> Decimal {
        if self.total == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.occupied) / Decimal::from(self.total)
            * Decimal::ONE_HUNDRED)
            .round_dp(2)
    }
}

/// Revenue of a single calendar month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Revenue {
    /// Sum of monthly rents of occupied [`Unit`]s.
    pub expected: Money,

    /// Money paid against the [`Payment`]s due this month.
    pub collected: Money,

    /// Money still to be paid against the [`Payment`]s due this month.
    pub outstanding: Money,
}

impl Revenue {
    /// Calculates the [`Revenue`] in the provided [`Currency`] of the month
    /// the `now` belongs to.
    ///
    /// Amounts in other [`Currency`]s are not counted.
    #[must_use]
    pub fn collect<'u, 'p>(
        currency: Currency,
        units: impl IntoIterator<Item = &'u Unit>,
        payments: impl IntoIterator<Item = &'p Payment>,
        now: DateTime,
    ) -> Self {
        let month = now.month_start();

        let expected = units
            .into_iter()
            .filter(|u| u.status == unit::Status::Occupied)
            .map(|u| u.monthly_rent)
            .fold(Money::zero(currency), add_same);

        let (collected, outstanding) = payments
            .into_iter()
            .filter(|p| p.due_at.coerce::<()>().month_start() == month)
            .fold(
                (Money::zero(currency), Money::zero(currency)),
                |(collected, outstanding), p| {
                    (
                        add_same(collected, p.amount_paid),
                        add_same(outstanding, p.outstanding()),
                    )
                },
            );

        Self {
            expected,
            collected,
            outstanding,
        }
    }
}

/// Money collected during a single calendar month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthlyRevenue {
    /// First moment of the month.
    pub month: DateTime,

    /// Money paid against the [`Payment`]s due this month.
    pub collected: Money,
}

/// Builds the collected revenue trend for the last `months` calendar months
/// up to the one the `now` belongs to (including it), oldest first.
///
/// [`Payment`]s are attributed to the month they are due in, and whatever was
/// paid against a waived one still counts. Amounts in other [`Currency`]s are
/// not counted.
#[must_use]
pub fn revenue_trend<'p>(
    currency: Currency,
    payments: impl IntoIterator<Item = &'p Payment>,
    now: DateTime,
    months: u32,
) -> Vec<MonthlyRevenue> {
    let mut buckets = (0..months)
        .rev()
        .map(|n| (now.months_before(n), Money::zero(currency)))
        .collect::<BTreeMap<_, _>>();

    for p in payments {
        if let Some(sum) =
            buckets.get_mut(&p.due_at.coerce::<()>().month_start())
        {
            *sum = add_same(*sum, p.amount_paid);
        }
    }

    buckets
        .into_iter()
        .map(|(month, collected)| MonthlyRevenue { month, collected })
        .collect()
}

/// Calculates the growth rate (in percents) of the `current` value comparing
/// to the `previous` one, rounded to two decimal places.
///
/// Growth from zero to anything positive is considered to be `100%`.
#[must_use]
pub fn growth_rate(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Adds the `other` [`Money`] to the `sum`, ignoring it if its [`Currency`]
/// differs.
fn add_same(sum: Money, other: Money) -> Money {
    sum.checked_add(other).unwrap_or(sum)
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{
        lease, payment, property, tenant, unit, Payment, Unit,
    };

    use super::{growth_rate, revenue_trend, Occupancy, Revenue};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn unit(status: unit::Status, rent: &str) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: property::Id::new(),
            number: unit::Number::new("A1").unwrap(),
            monthly_rent: money(rent),
            status,
            created_at: DateTime::now().coerce(),
        }
    }

    fn payment(
        due_at: DateTime,
        amount: &str,
        paid: &str,
        status: payment::Status,
    ) -> Payment {
        Payment {
            id: payment::Id::new(),
            tenant_id: tenant::Id::new(),
            lease_id: lease::Id::new(),
            property_id: property::Id::new(),
            unit_id: unit::Id::new(),
            amount: money(amount),
            amount_paid: money(paid),
            due_at: due_at.coerce(),
            paid_at: None,
            method: None,
            reference: None,
            status,
            created_at: DateTime::now().coerce(),
        }
    }

    fn date(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    #[test]
    fn occupancy() {
        use unit::Status as S;

        let units = [
            unit(S::Occupied, "100KES"),
            unit(S::Occupied, "100KES"),
            unit(S::Occupied, "100KES"),
            unit(S::Available, "100KES"),
            unit(S::Maintenance, "100KES"),
            unit(S::Reserved, "100KES"),
        ];
        let o = Occupancy::collect(&units);

        assert_eq!(
            o,
            Occupancy {
                total: 6,
                occupied: 3,
                available: 1,
                maintenance: 1,
            },
        );
        assert_eq!(o.rate(), Decimal::from(50));
    }

    #[test]
    fn occupancy_rate_without_units() {
        assert_eq!(Occupancy::default().rate(), Decimal::ZERO);
    }

    #[test]
    fn revenue_of_current_month() {
        use payment::Status as S;

        let now = date("2024-03-15T10:00:00Z");
        let units = [
            unit(unit::Status::Occupied, "25000KES"),
            unit(unit::Status::Occupied, "30000KES"),
            unit(unit::Status::Available, "40000KES"),
            unit(unit::Status::Occupied, "500USD"),
        ];
        let payments = [
            payment(date("2024-03-01T00:00:00Z"), "25000KES", "25000KES", S::Paid),
            payment(date("2024-03-05T00:00:00Z"), "30000KES", "10000KES", S::Partial),
            payment(date("2024-02-05T00:00:00Z"), "30000KES", "0KES", S::Overdue),
        ];

        assert_eq!(
            Revenue::collect(Currency::Kes, &units, &payments, now),
            Revenue {
                expected: money("55000KES"),
                collected: money("35000KES"),
                outstanding: money("20000KES"),
            },
        );
    }

    #[test]
    fn trend_buckets_by_due_month() {
        use payment::Status as S;

        let now = date("2024-01-20T10:00:00Z");
        let payments = [
            payment(date("2023-11-01T00:00:00Z"), "100KES", "100KES", S::Paid),
            payment(date("2024-01-01T00:00:00Z"), "100KES", "40KES", S::Partial),
            payment(date("2024-01-10T00:00:00Z"), "100KES", "100KES", S::Paid),
            payment(date("2023-06-01T00:00:00Z"), "100KES", "100KES", S::Paid),
        ];

        let trend = revenue_trend(Currency::Kes, &payments, now, 3);

        assert_eq!(
            trend
                .iter()
                .map(|m| (m.month, m.collected))
                .collect::<Vec<_>>(),
            vec![
                (date("2023-11-01T00:00:00Z"), money("100KES")),
                (date("2023-12-01T00:00:00Z"), money("0KES")),
                (date("2024-01-01T00:00:00Z"), money("140KES")),
            ],
        );
    }

    #[test]
    fn trend_counts_paid_part_of_waived_payment() {
        use payment::Status as S;

        let now = date("2024-03-15T10:00:00Z");
        let units = [unit(unit::Status::Occupied, "100KES")];
        let payments = [
            payment(date("2024-03-01T00:00:00Z"), "100KES", "30KES", S::Waived),
            payment(date("2024-03-02T00:00:00Z"), "100KES", "100KES", S::Paid),
        ];

        let trend = revenue_trend(Currency::Kes, &payments, now, 1);

        assert_eq!(trend[0].collected, money("130KES"));
        assert_eq!(
            trend[0].collected,
            Revenue::collect(Currency::Kes, &units, &payments, now).collected,
        );
    }

    #[test]
    fn growth() {
        assert_eq!(growth_rate(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            growth_rate(Decimal::from(5), Decimal::ZERO),
            Decimal::ONE_HUNDRED,
        );
        assert_eq!(
            growth_rate(Decimal::from(150), Decimal::from(100)),
            Decimal::from(50),
        );
        assert_eq!(
            growth_rate(Decimal::from(50), Decimal::from(200)),
            Decimal::from(-75),
        );
    }
}
