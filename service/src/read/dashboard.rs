//! Dashboard read model definitions.

use rust_decimal::Decimal;

use crate::domain::{
    caretaker::duty,
    dashboard::{MonthlyRevenue, Occupancy, Revenue},
    maintenance, proprietor, user,
};
#[cfg(doc)]
use crate::domain::{Property, Proprietor, User};

/// Set of [`Property`]s statistics are gathered over.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// All the non-inactive [`Property`]s.
    All,

    /// [`Property`]s actively managed by the property manager [`User`].
    ManagedBy(user::Id),

    /// [`Property`]s actively (partially) owned by the [`Proprietor`].
    OwnedBy(proprietor::Id),
}

/// Dashboard statistics of a [`Scope`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stats {
    /// Number of [`Property`]s in the [`Scope`].
    pub properties: u32,

    /// [`Occupancy`] of units.
    pub occupancy: Occupancy,

    /// [`Occupancy::rate()`] in percents.
    pub occupancy_rate: Decimal,

    /// [`Revenue`] of the current month.
    pub revenue: Revenue,

    /// Collected revenue of the last months, oldest first.
    pub revenue_trend: Vec<MonthlyRevenue>,

    /// Growth rate (in percents) of the collected revenue comparing to the
    /// previous month.
    pub revenue_growth_rate: Decimal,

    /// [`maintenance::Stats`] of all requests.
    pub maintenance: maintenance::Stats,

    /// [`duty::Stats`] of all caretaker duties.
    pub duties: duty::Stats,
}
