//! Maintenance [`Request`]-related definitions.

use common::{DateTime, Handler as _, Rating};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, AsError, Context, Error};

/// Maintenance request reported for a [`Property`].
///
/// [`Property`]: api::Property
#[derive(Clone, Debug, From)]
pub struct Request(domain::MaintenanceRequest);

/// Maintenance request reported for a `Property`.
#[graphql_object(name = "MaintenanceRequest", context = Context)]
impl Request {
    /// Unique identifier of this `MaintenanceRequest`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` who reported this `MaintenanceRequest`.
    #[must_use]
    pub fn reporter(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Request` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.reporter_id)
        }
    }

    /// `Property` this `MaintenanceRequest` is reported for.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Request` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// `Unit` this `MaintenanceRequest` is reported for, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceRequest.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit(&self, ctx: &Context) -> Result<Option<api::Unit>, Error> {
        match self.0.unit_id {
            Some(id) => api::query::unit(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// `TechnicianCategory` of the reported issue, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceRequest.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::technician::Category>, Error> {
        let Some(id) = self.0.category_id else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::technician::CategoryById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// Title of this `MaintenanceRequest`.
    #[must_use]
    pub fn title(&self) -> Title {
        self.0.title.clone().into()
    }

    /// Description of this `MaintenanceRequest`.
    #[must_use]
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Priority of this `MaintenanceRequest`.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.0.priority.into()
    }

    /// Status of this `MaintenanceRequest`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `Technician` this `MaintenanceRequest` is assigned to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceRequest.technician",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn technician(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Technician>, Error> {
        let Some(id) = self.0.technician_id else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::technician::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|t| t.map(Into::into))
    }

    /// `DateTime` the assigned `Technician` should respond by.
    #[must_use]
    pub fn response_deadline(&self) -> Option<DateTime> {
        self.0.response_deadline.map(|at| at.coerce())
    }

    /// Indicator whether this `MaintenanceRequest` was escalated to the
    /// property manager.
    #[must_use]
    pub fn is_escalated(&self) -> bool {
        self.0.is_escalated
    }

    /// `DateTime` when this `MaintenanceRequest` was escalated.
    #[must_use]
    pub fn escalated_at(&self) -> Option<DateTime> {
        self.0.escalated_at.map(|at| at.coerce())
    }

    /// Reason of the escalation.
    #[must_use]
    pub fn escalation_reason(&self) -> Option<Reason> {
        self.0.escalation_reason.clone().map(Into::into)
    }

    /// Indicator whether this `MaintenanceRequest` waits for the property
    /// manager: it's open and either unassigned or escalated.
    #[must_use]
    pub fn needs_manager(&self) -> bool {
        self.0.needs_manager()
    }

    /// Rating given by the reporter after completion.
    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.0.rating
    }

    /// `DateTime` when this `MaintenanceRequest` was reported.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `MaintenanceRequest` was completed.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// `JobUpdate`s posted on this `MaintenanceRequest`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceRequest.jobHistory",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn job_history(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::technician::JobUpdate>, Error> {
        ctx.service()
            .execute(query::technician::JobHistory::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|us| us.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `MaintenanceRequest`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::maintenance::Id)]
#[into(domain::maintenance::Id)]
#[graphql(name = "MaintenanceRequestId", transparent)]
pub struct Id(Uuid);

/// Title of a `MaintenanceRequest`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaintenanceRequestTitle",
    with = scalar::Via::<domain::maintenance::Title>,
)]
pub struct Title(domain::maintenance::Title);

/// Description of a `MaintenanceRequest`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaintenanceRequestDescription",
    with = scalar::Via::<domain::maintenance::Description>,
)]
pub struct Description(domain::maintenance::Description);

/// Reason of a `MaintenanceRequest` escalation.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaintenanceRequestEscalationReason",
    with = scalar::Via::<domain::maintenance::Reason>,
)]
pub struct Reason(domain::maintenance::Reason);

define_enum! {
    #[doc = "Priority of a `MaintenanceRequest`."]
    #[graphql(name = "MaintenanceRequestPriority")]
    enum Priority for domain::maintenance::Priority {
        #[doc = "May wait."]
        Low,

        #[doc = "Should be done soon."]
        Medium,

        #[doc = "Should be done as soon as possible."]
        High,

        #[doc = "Threatens people or the `Property`."]
        Emergency,
    }
}

define_enum! {
    #[doc = "Status of a `MaintenanceRequest`."]
    #[graphql(name = "MaintenanceRequestStatus")]
    enum Status for domain::maintenance::Status {
        #[doc = "Waiting for a `Technician` to start."]
        Pending,

        #[doc = "Being worked on."]
        InProgress,

        #[doc = "Resolved."]
        Completed,

        #[doc = "Withdrawn."]
        Cancelled,
    }
}
