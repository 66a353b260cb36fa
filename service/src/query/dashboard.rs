//! [`Dashboard`] definition.

use common::{
    money::Currency,
    operations::{By, Select},
    DateTime,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        caretaker::{duty, Duty},
        dashboard::{self, Occupancy, Revenue},
        maintenance, property, MaintenanceRequest, Payment, Unit,
    },
    infra::{database, Database},
    read::dashboard::{Scope, Stats},
    Query, Service,
};

/// [`Query`] gathering dashboard [`Stats`] of the [`Property`]s in a
/// [`Scope`].
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dashboard {
    /// [`Scope`] to gather [`Stats`] over.
    pub scope: Scope,

    /// [`Currency`] to count revenue in.
    pub currency: Currency,

    /// Number of calendar months in the revenue trend.
    pub trend_months: u32,
}

impl<Db> Query<Dashboard> for Service<Db>
where
    Db: Database<
            Select<By<Vec<property::Id>, Scope>>,
            Ok = Vec<property::Id>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Unit>, Vec<property::Id>>>,
            Ok = Vec<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, Vec<property::Id>>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<MaintenanceRequest>, Vec<property::Id>>>,
            Ok = Vec<MaintenanceRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Duty>, Vec<property::Id>>>,
            Ok = Vec<Duty>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Dashboard {
            scope,
            currency,
            trend_months,
        }: Dashboard,
    ) -> Result<Self::Ok, Self::Err> {
        let property_ids = self
            .database()
            .execute(Select(By::<Vec<property::Id>, _>::new(scope)))
            .await
            .map_err(tracerr::wrap!())?;

        let units = self
            .database()
            .execute(Select(By::<Vec<Unit>, _>::new(property_ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        let payments = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(property_ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        let requests = self
            .database()
            .execute(Select(By::<Vec<MaintenanceRequest>, _>::new(
                property_ids.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let duties = self
            .database()
            .execute(Select(By::<Vec<Duty>, _>::new(property_ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let occupancy = Occupancy::collect(&units);

        // At least two months are required for the growth rate.
        let mut trend = dashboard::revenue_trend(
            currency,
            &payments,
            now,
            trend_months.max(2),
        );
        let growth = match trend.as_slice() {
            [.., previous, current] => dashboard::growth_rate(
                current.collected.amount,
                previous.collected.amount,
            ),
            _ => Decimal::ZERO,
        };
        let excess = trend
            .len()
            .saturating_sub(usize::try_from(trend_months).unwrap_or(usize::MAX));
        _ = trend.drain(..excess);

        Ok(Stats {
            properties: u32::try_from(property_ids.len()).unwrap_or(u32::MAX),
            occupancy,
            occupancy_rate: occupancy.rate(),
            revenue: Revenue::collect(currency, &units, &payments, now),
            revenue_trend: trend,
            revenue_growth_rate: growth,
            maintenance: maintenance::Stats::collect(&requests),
            duties: duty::Stats::collect(&duties),
        })
    }
}
