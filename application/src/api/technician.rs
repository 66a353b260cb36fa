//! [`Technician`]-related definitions.

use common::{DateTime, Handler as _, Rating};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, AsError, Context, Error};

/// Registered technician resolving [`MaintenanceRequest`]s.
///
/// [`MaintenanceRequest`]: api::MaintenanceRequest
#[derive(Clone, Debug, From)]
pub struct Technician(domain::Technician);

/// Registered technician resolving `MaintenanceRequest`s.
#[graphql_object(context = Context)]
impl Technician {
    /// Unique identifier of this `Technician`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` account of this `Technician`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Technician` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// `TechnicianCategory` of this `Technician`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Technician.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        ctx.service()
            .execute(query::technician::CategoryById::by(self.0.category_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::TechnicianError::CategoryNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Indicator whether this `Technician` takes new jobs.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.0.is_available
    }

    /// Average rating of the completed jobs.
    #[must_use]
    pub fn average_rating(&self) -> Rating {
        self.0.average_rating
    }

    /// Number of ratings the `averageRating` is computed over.
    #[must_use]
    pub fn ratings_count(&self) -> i32 {
        i32::try_from(self.0.ratings_count).unwrap_or(i32::MAX)
    }

    /// Number of completed jobs.
    #[must_use]
    pub fn total_jobs_completed(&self) -> i32 {
        i32::try_from(self.0.total_jobs_completed).unwrap_or(i32::MAX)
    }

    /// Status of this `Technician`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Technician` was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `MaintenanceRequest`s assigned to this `Technician`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Technician.jobs",
            otel.name = api::Query::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn jobs(
        &self,
        status: Option<api::maintenance::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceRequest>, Error> {
        ctx.service()
            .execute(query::maintenance::AssignedTo::by(
                read::maintenance::AssignedTo {
                    technician_id: self.0.id,
                    status: status.map(Into::into),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Technician`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::technician::Id)]
#[into(domain::technician::Id)]
#[graphql(name = "TechnicianId", transparent)]
pub struct Id(Uuid);

define_enum! {
    #[doc = "Status of a `Technician`."]
    #[graphql(name = "TechnicianStatus")]
    enum Status for domain::technician::Status {
        #[doc = "Works on the platform."]
        Active,

        #[doc = "Doesn't work on the platform anymore."]
        Inactive,

        #[doc = "Temporarily forbidden to take jobs."]
        Suspended,
    }
}

/// Specialization of [`Technician`]s.
#[derive(Clone, Debug, From)]
pub struct Category(domain::technician::Category);

/// Specialization of `Technician`s.
#[graphql_object(name = "TechnicianCategory", context = Context)]
impl Category {
    /// Unique identifier of this `TechnicianCategory`.
    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.0.id.into()
    }

    /// Unique name of this `TechnicianCategory`.
    #[must_use]
    pub fn name(&self) -> CategoryName {
        self.0.name.clone().into()
    }

    /// Description of this `TechnicianCategory`.
    #[must_use]
    pub fn description(&self) -> Option<CategoryDescription> {
        self.0.description.clone().map(Into::into)
    }

    /// Indicator whether new `Technician`s and `MaintenanceRequest`s may
    /// refer this `TechnicianCategory`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }
}

/// Unique identifier of a `TechnicianCategory`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::technician::category::Id)]
#[into(domain::technician::category::Id)]
#[graphql(name = "TechnicianCategoryId", transparent)]
pub struct CategoryId(Uuid);

/// Name of a `TechnicianCategory`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "TechnicianCategoryName",
    with = scalar::Via::<domain::technician::category::Name>,
)]
pub struct CategoryName(domain::technician::category::Name);

/// Description of a `TechnicianCategory`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "TechnicianCategoryDescription",
    with = scalar::Via::<domain::technician::category::Description>,
)]
pub struct CategoryDescription(domain::technician::category::Description);

/// Assignment of a [`Technician`] to serve a [`Property`].
///
/// [`Property`]: api::Property
#[derive(Clone, Debug, From)]
pub struct Assignment(domain::technician::Assignment);

/// Assignment of a `Technician` to serve a `Property`.
#[graphql_object(name = "TechnicianAssignment", context = Context)]
impl Assignment {
    /// Unique identifier of this `TechnicianAssignment`.
    #[must_use]
    pub fn id(&self) -> AssignmentId {
        self.0.id.into()
    }

    /// Assigned `Technician`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "TechnicianAssignment.technician",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn technician(&self, ctx: &Context) -> Result<Technician, Error> {
        ctx.service()
            .execute(query::technician::ById::by(self.0.technician_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::TechnicianError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Served `Property`.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Assignment` loaded from repository guarantees \
                      `Property` existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Indicator whether this `TechnicianAssignment` is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `TechnicianAssignment` was (re)made.
    #[must_use]
    pub fn assigned_at(&self) -> DateTime {
        self.0.assigned_at.coerce()
    }
}

/// Unique identifier of a `TechnicianAssignment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::technician::assignment::Id)]
#[into(domain::technician::assignment::Id)]
#[graphql(name = "TechnicianAssignmentId", transparent)]
pub struct AssignmentId(Uuid);

/// Progress note posted by a [`Technician`] on a [`MaintenanceRequest`].
///
/// [`MaintenanceRequest`]: api::MaintenanceRequest
#[derive(Clone, Debug, From)]
pub struct JobUpdate(domain::technician::job::Update);

/// Progress note posted by a `Technician` on a `MaintenanceRequest`.
#[graphql_object(context = Context)]
impl JobUpdate {
    /// Unique identifier of this `JobUpdate`.
    #[must_use]
    pub fn id(&self) -> JobUpdateId {
        self.0.id.into()
    }

    /// `MaintenanceRequest` this `JobUpdate` is posted on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "JobUpdate.request",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn request(
        &self,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        ctx.service()
            .execute(query::maintenance::ById::by(self.0.request_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| {
                api::query::MaintenanceRequestError::NotExists.into()
            })
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `Technician` who posted this `JobUpdate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "JobUpdate.technician",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn technician(&self, ctx: &Context) -> Result<Technician, Error> {
        ctx.service()
            .execute(query::technician::ById::by(self.0.technician_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::TechnicianError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reported status of the job.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.0.status.into()
    }

    /// Notes on the work, if any.
    #[must_use]
    pub fn notes(&self) -> Option<JobNotes> {
        self.0.notes.clone().map(Into::into)
    }

    /// Kind of this `JobUpdate`.
    #[must_use]
    pub fn kind(&self) -> JobUpdateKind {
        self.0.kind.into()
    }

    /// `DateTime` when this `JobUpdate` was posted.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `JobUpdate`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::technician::job::Id)]
#[into(domain::technician::job::Id)]
#[graphql(name = "JobUpdateId", transparent)]
pub struct JobUpdateId(Uuid);

/// Notes of a `JobUpdate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "JobNotes",
    with = scalar::Via::<domain::technician::job::Notes>,
)]
pub struct JobNotes(domain::technician::job::Notes);

define_enum! {
    #[doc = "Status of a job reported by a `JobUpdate`."]
    #[graphql(name = "JobStatus")]
    enum JobStatus for domain::technician::job::Status {
        #[doc = "Accepted by the `Technician`."]
        Accepted,

        #[doc = "Being worked on."]
        InProgress,

        #[doc = "Work is done."]
        Completed,

        #[doc = "Declined by the `Technician`."]
        Rejected,

        #[doc = "Paused."]
        OnHold,
    }
}

define_enum! {
    #[doc = "Kind of a `JobUpdate`."]
    #[graphql(name = "JobUpdateKind")]
    enum JobUpdateKind for domain::technician::job::Kind {
        #[doc = "Change of the `JobStatus`."]
        StatusChange,

        #[doc = "Plain comment."]
        Comment,

        #[doc = "Change of the work schedule."]
        ScheduleUpdate,
    }
}
