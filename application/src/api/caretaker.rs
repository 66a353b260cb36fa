//! [`Caretaker`] and [`Duty`] definitions.

use common::{DateTime, Handler as _, Rating};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, AsError, Context, Error};

/// On-site caretaker of a [`Property`].
///
/// [`Property`]: api::Property
#[derive(Clone, Debug, From)]
pub struct Caretaker(domain::Caretaker);

/// On-site caretaker of a `Property`.
#[graphql_object(context = Context)]
impl Caretaker {
    /// Unique identifier of this `Caretaker`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` account of this `Caretaker`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Caretaker` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// `Property` this `Caretaker` looks after, if assigned.
    #[must_use]
    pub fn property(&self) -> Option<api::Property> {
        let id = self.0.property_id?;
        #[expect(
            unsafe_code,
            reason = "`Caretaker` loaded from repository guarantees \
                      `Property` existence"
        )]
        unsafe {
            Some(api::Property::new_unchecked(id))
        }
    }

    /// Property manager supervising this `Caretaker`.
    #[must_use]
    pub fn manager(&self) -> Option<api::User> {
        let id = self.0.manager_id?;
        #[expect(
            unsafe_code,
            reason = "`Caretaker` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            Some(api::User::new_unchecked(id))
        }
    }

    /// Status of this `Caretaker`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Performance rating given by the supervisor.
    #[must_use]
    pub fn performance_rating(&self) -> Option<Rating> {
        self.0.performance_rating
    }

    /// `DateTime` when this `Caretaker` was hired.
    #[must_use]
    pub fn hired_at(&self) -> DateTime {
        self.0.hired_at.coerce()
    }

    /// `DateTime` when this `Caretaker` was assigned to the current
    /// `Property`.
    #[must_use]
    pub fn assigned_at(&self) -> Option<DateTime> {
        self.0.assigned_at.map(|at| at.coerce())
    }

    /// `Duty`s of this `Caretaker`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Caretaker.duties",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn duties(&self, ctx: &Context) -> Result<Vec<Duty>, Error> {
        ctx.service()
            .execute(query::caretaker::DutiesOfCaretaker::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ds| ds.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Caretaker`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::caretaker::Id)]
#[into(domain::caretaker::Id)]
#[graphql(name = "CaretakerId", transparent)]
pub struct Id(Uuid);

define_enum! {
    #[doc = "Status of a `Caretaker`."]
    #[graphql(name = "CaretakerStatus")]
    enum Status for domain::caretaker::Status {
        #[doc = "Works on site."]
        Active,

        #[doc = "Temporarily forbidden to work."]
        Suspended,
    }
}

/// Task given to a [`Caretaker`] by the property manager.
#[derive(Clone, Debug, From)]
pub struct Duty(domain::caretaker::Duty);

/// Task given to a `Caretaker` by the property manager.
#[graphql_object(context = Context)]
impl Duty {
    /// Unique identifier of this `Duty`.
    #[must_use]
    pub fn id(&self) -> DutyId {
        self.0.id.into()
    }

    /// `Caretaker` responsible for this `Duty`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Duty.caretaker",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn caretaker(&self, ctx: &Context) -> Result<Caretaker, Error> {
        ctx.service()
            .execute(query::caretaker::ById::by(self.0.caretaker_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::CaretakerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `Property` this `Duty` is done at.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Duty` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Property manager who gave this `Duty`.
    #[must_use]
    pub fn assigned_by(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Duty` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.assigned_by)
        }
    }

    /// Title of this `Duty`.
    #[must_use]
    pub fn title(&self) -> DutyTitle {
        self.0.title.clone().into()
    }

    /// Description of this `Duty`.
    #[must_use]
    pub fn description(&self) -> Option<DutyText> {
        self.0.description.clone().map(Into::into)
    }

    /// Kind of this `Duty`.
    #[must_use]
    pub fn kind(&self) -> DutyKind {
        self.0.kind.into()
    }

    /// Priority of this `Duty`.
    #[must_use]
    pub fn priority(&self) -> DutyPriority {
        self.0.priority.into()
    }

    /// Status of this `Duty`.
    #[must_use]
    pub fn status(&self) -> DutyStatus {
        self.0.status.into()
    }

    /// `DateTime` this `Duty` should be done by.
    #[must_use]
    pub fn due_at(&self) -> Option<DateTime> {
        self.0.due_at.map(|at| at.coerce())
    }

    /// `DateTime` when the work on this `Duty` started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime> {
        self.0.started_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Duty` was completed.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// Completion report of the `Caretaker`.
    #[must_use]
    pub fn report(&self) -> Option<DutyText> {
        self.0.report.clone().map(Into::into)
    }

    /// Review feedback of the property manager.
    #[must_use]
    pub fn feedback(&self) -> Option<DutyText> {
        self.0.feedback.clone().map(Into::into)
    }

    /// Review rating of the property manager.
    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.0.rating
    }

    /// `DateTime` when this `Duty` was reviewed.
    #[must_use]
    pub fn reviewed_at(&self) -> Option<DateTime> {
        self.0.reviewed_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Duty` was given.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Duty`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::caretaker::duty::Id)]
#[into(domain::caretaker::duty::Id)]
#[graphql(name = "DutyId", transparent)]
pub struct DutyId(Uuid);

/// Title of a `Duty`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DutyTitle",
    with = scalar::Via::<domain::caretaker::duty::Title>,
)]
pub struct DutyTitle(domain::caretaker::duty::Title);

/// Free text of a `Duty`: its description, report or feedback.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DutyText",
    with = scalar::Via::<domain::caretaker::duty::Text>,
)]
pub struct DutyText(domain::caretaker::duty::Text);

define_enum! {
    #[doc = "Kind of a `Duty`."]
    #[graphql(name = "DutyKind")]
    enum DutyKind for domain::caretaker::duty::Kind {
        #[doc = "General task."]
        General,

        #[doc = "Cleaning."]
        Cleaning,

        #[doc = "Security round."]
        Security,

        #[doc = "Minor maintenance."]
        Maintenance,

        #[doc = "Inspection."]
        Inspection,

        #[doc = "Anything else."]
        Other,
    }
}

define_enum! {
    #[doc = "Priority of a `Duty`."]
    #[graphql(name = "DutyPriority")]
    enum DutyPriority for domain::caretaker::duty::Priority {
        #[doc = "May wait."]
        Low,

        #[doc = "Should be done soon."]
        Medium,

        #[doc = "Should be done as soon as possible."]
        High,

        #[doc = "Must be done immediately."]
        Urgent,
    }
}

define_enum! {
    #[doc = "Status of a `Duty`."]
    #[graphql(name = "DutyStatus")]
    enum DutyStatus for domain::caretaker::duty::Status {
        #[doc = "Not started yet."]
        Pending,

        #[doc = "Being done."]
        InProgress,

        #[doc = "Done and reported."]
        Completed,

        #[doc = "Withdrawn by the property manager."]
        Cancelled,

        #[doc = "Not started by its due date."]
        Overdue,
    }
}
