//! Dashboard [`Stats`] definitions.

use common::{DateTime, Money, Percent, Rating};
use juniper::GraphQLObject;
use service::{domain, read};

use crate::define_enum;

define_enum! {
    #[doc = "Currency the dashboard revenue is counted in."]
    #[graphql(name = "Currency")]
    enum Currency for common::money::Currency {
        #[doc = "Kenyan Shilling."]
        Kes,

        #[doc = "US Dollar."]
        Usd,
    }
}

/// Statistics over the `Property`s visible to the current `User`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "DashboardStats")]
pub struct Stats {
    /// Number of `Property`s the statistics are gathered over.
    pub properties: i32,

    /// Occupancy of the `Unit`s.
    pub occupancy: Occupancy,

    /// Share of the occupied `Unit`s.
    pub occupancy_rate: Percent,

    /// Revenue of the current month.
    pub revenue: Revenue,

    /// Revenue collected in the last months, oldest first.
    pub revenue_trend: Vec<MonthlyRevenue>,

    /// Growth of the collected revenue comparing to the previous month, in
    /// percents.
    ///
    /// Negative on a decline.
    pub revenue_growth_rate: String,

    /// Statistics of the `MaintenanceRequest`s.
    pub maintenance: MaintenanceStats,

    /// Statistics of the caretaker `Duty`s.
    pub duties: DutyStats,
}

impl From<read::dashboard::Stats> for Stats {
    fn from(stats: read::dashboard::Stats) -> Self {
        let read::dashboard::Stats {
            properties,
            occupancy,
            occupancy_rate,
            revenue,
            revenue_trend,
            revenue_growth_rate,
            maintenance,
            duties,
        } = stats;
        Self {
            properties: count(properties),
            occupancy: occupancy.into(),
            occupancy_rate: Percent::new(occupancy_rate)
                .unwrap_or(Percent::ZERO),
            revenue: revenue.into(),
            revenue_trend: revenue_trend.into_iter().map(Into::into).collect(),
            revenue_growth_rate: revenue_growth_rate.to_string(),
            maintenance: maintenance.into(),
            duties: duties.into(),
        }
    }
}

/// Occupancy of `Unit`s.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DashboardOccupancy")]
pub struct Occupancy {
    /// Total number of `Unit`s.
    pub total: i32,

    /// Number of occupied `Unit`s.
    pub occupied: i32,

    /// Number of available `Unit`s.
    pub available: i32,

    /// Number of `Unit`s under maintenance.
    pub maintenance: i32,
}

impl From<domain::dashboard::Occupancy> for Occupancy {
    fn from(o: domain::dashboard::Occupancy) -> Self {
        Self {
            total: count(o.total),
            occupied: count(o.occupied),
            available: count(o.available),
            maintenance: count(o.maintenance),
        }
    }
}

/// Rent revenue of a month.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DashboardRevenue")]
pub struct Revenue {
    /// Rent charged for the month.
    pub expected: Money,

    /// Rent paid for the month.
    pub collected: Money,

    /// Rent left to pay for the month.
    pub outstanding: Money,
}

impl From<domain::dashboard::Revenue> for Revenue {
    fn from(r: domain::dashboard::Revenue) -> Self {
        Self {
            expected: r.expected,
            collected: r.collected,
            outstanding: r.outstanding,
        }
    }
}

/// Collected rent of a single month.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DashboardMonthlyRevenue")]
pub struct MonthlyRevenue {
    /// Beginning of the month.
    pub month: DateTime,

    /// Rent paid for the month.
    pub collected: Money,
}

impl From<domain::dashboard::MonthlyRevenue> for MonthlyRevenue {
    fn from(r: domain::dashboard::MonthlyRevenue) -> Self {
        Self {
            month: r.month,
            collected: r.collected,
        }
    }
}

/// Counters of `MaintenanceRequest`s.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DashboardMaintenanceStats")]
pub struct MaintenanceStats {
    /// Total number of `MaintenanceRequest`s.
    pub total: i32,

    /// Number of pending `MaintenanceRequest`s.
    pub pending: i32,

    /// Number of `MaintenanceRequest`s in progress.
    pub in_progress: i32,

    /// Number of completed `MaintenanceRequest`s.
    pub completed: i32,

    /// Number of cancelled `MaintenanceRequest`s.
    pub cancelled: i32,

    /// Number of high priority and emergency `MaintenanceRequest`s.
    pub urgent: i32,
}

impl From<domain::maintenance::Stats> for MaintenanceStats {
    fn from(s: domain::maintenance::Stats) -> Self {
        Self {
            total: count(s.total),
            pending: count(s.pending),
            in_progress: count(s.in_progress),
            completed: count(s.completed),
            cancelled: count(s.cancelled),
            urgent: count(s.urgent),
        }
    }
}

/// Counters of caretaker `Duty`s.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "DashboardDutyStats")]
pub struct DutyStats {
    /// Total number of `Duty`s.
    pub total: i32,

    /// Number of completed `Duty`s.
    pub completed: i32,

    /// Number of pending `Duty`s.
    pub pending: i32,

    /// Number of `Duty`s in progress.
    pub in_progress: i32,

    /// Number of overdue `Duty`s.
    pub overdue: i32,

    /// Average review rating of the `Duty`s.
    pub average_rating: Option<Rating>,
}

impl From<domain::caretaker::duty::Stats> for DutyStats {
    fn from(s: domain::caretaker::duty::Stats) -> Self {
        Self {
            total: count(s.total),
            completed: count(s.completed),
            pending: count(s.pending),
            in_progress: count(s.in_progress),
            overdue: count(s.overdue),
            average_rating: s.average_rating,
        }
    }
}

/// Converts the provided counter into a GraphQL `Int`, saturating it.
fn count(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod spec {
    use super::count;

    #[test]
    fn count_saturates() {
        assert_eq!(count(7), 7);
        assert_eq!(count(u32::MAX), i32::MAX);
    }
}
