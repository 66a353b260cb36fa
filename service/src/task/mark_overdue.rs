//! [`MarkOverdue`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start, Update};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{caretaker::duty, payment, Payment},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::caretaker::Duty;

use super::Task;

/// Configuration for [`MarkOverdue`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between checks of due dates.
    pub interval: time::Duration,
}

/// [`Task`] marking rent [`Payment`]s and caretaker [`Duty`]s, which are not
/// done by their due date, as overdue.
#[derive(Clone, Copy, Debug)]
pub struct MarkOverdue<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<MarkOverdue<Self>, Config>>> for Service<Db>
where
    MarkOverdue<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<MarkOverdue<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = MarkOverdue {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::MarkOverdue` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for MarkOverdue<Service<Db>>
where
    Db: Database<
            Update<By<Payment, payment::DueDateTime>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Update<By<duty::Duty, duty::DueDateTime>>,
            Ok = u64,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let payments = self
            .service
            .database()
            .execute(Update(By::<Payment, _>::new(
                payment::DueDateTime::now(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let duties = self
            .service
            .database()
            .execute(Update(By::<duty::Duty, _>::new(duty::DueDateTime::now())))
            .await
            .map_err(tracerr::wrap!())?;

        if payments > 0 || duties > 0 {
            log::info!(
                "marked {payments} rent payment(s) and {duties} duty(ies) \
                 as overdue",
            );
        }
        Ok(())
    }
}

/// Error of [`MarkOverdue`] execution.
pub type ExecutionError = Traced<database::Error>;
