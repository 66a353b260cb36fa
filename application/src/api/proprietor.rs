//! [`Proprietor`]-related definitions.

use common::{DateTime, Handler as _, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, AsError, Context, Error};

/// [`User`] owning shares of [`Property`]s.
///
/// [`Property`]: api::Property
/// [`User`]: api::User
#[derive(Clone, Debug, From)]
pub struct Proprietor(domain::Proprietor);

/// `User` owning shares of `Property`s.
#[graphql_object(context = Context)]
impl Proprietor {
    /// Unique identifier of this `Proprietor`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `User` account of this `Proprietor`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Proprietor` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// Name of this `Proprietor`'s business.
    #[must_use]
    pub fn business_name(&self) -> Option<BusinessName> {
        self.0.business_name.clone().map(Into::into)
    }

    /// Official registration number of this `Proprietor`'s business.
    #[must_use]
    pub fn registration_number(&self) -> Option<RegistrationNumber> {
        self.0.registration_number.clone().map(Into::into)
    }

    /// Status of this `Proprietor`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Proprietor` was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// Active `Ownership`s of this `Proprietor`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proprietor.ownerships",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ownerships(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Ownership>, Error> {
        ctx.service()
            .execute(query::proprietor::Ownerships::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// `ProprietorReport`s addressed to this `Proprietor`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` is neither this
    ///                             `Proprietor` nor a manager of the
    ///                             specified `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proprietor.reports",
            otel.name = api::Query::SPAN_NAME,
            property_id = ?property_id,
        ),
    )]
    pub async fn reports(
        &self,
        property_id: Option<api::property::Id>,
        ctx: &Context,
    ) -> Result<Vec<Report>, Error> {
        if !self.is_viewed_by_owner(ctx).await? {
            match property_id {
                Some(id) => {
                    _ = ctx.manager_session(id.into()).await?;
                }
                None => {
                    return Err(api::PrivilegeError::Manager.into())
                        .map_err(ctx.error());
                }
            }
        }

        ctx.service()
            .execute(query::proprietor::Reports::by(read::proprietor::Reports {
                proprietor_id: self.0.id,
                property_id: property_id.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// `ProprietorMessage`s sent to this `Proprietor`, newest first.
    ///
    /// Only unread ones are returned if `unreadOnly` is `true`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither this
    ///                             `Proprietor` nor a super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proprietor.messages",
            otel.name = api::Query::SPAN_NAME,
            unread_only = ?unread_only,
        ),
    )]
    pub async fn messages(
        &self,
        unread_only: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<Message>, Error> {
        if !self.is_viewed_by_owner(ctx).await? {
            return Err(api::PrivilegeError::NotAllowed.into())
                .map_err(ctx.error());
        }

        ctx.service()
            .execute(query::proprietor::Messages::by(
                read::proprietor::Messages {
                    proprietor_id: self.0.id,
                    unread_only: unread_only.unwrap_or_default(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ms| ms.into_iter().map(Into::into).collect())
    }

    /// Number of unread `ProprietorMessage`s of this `Proprietor`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither this
    ///                             `Proprietor` nor a super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proprietor.unreadMessagesCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unread_messages_count(
        &self,
        ctx: &Context,
    ) -> Result<i32, Error> {
        if !self.is_viewed_by_owner(ctx).await? {
            return Err(api::PrivilegeError::NotAllowed.into())
                .map_err(ctx.error());
        }

        ctx.service()
            .execute(query::proprietor::UnreadMessagesCount::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl Proprietor {
    /// Checks whether the current `Session` belongs to this [`Proprietor`] or
    /// to a super-admin.
    async fn is_viewed_by_owner(&self, ctx: &Context) -> Result<bool, Error> {
        let session = ctx.current_session().await?;
        Ok(session.role == domain::user::Role::SuperAdmin
            || api::user::Id::from(self.0.user_id) == session.user_id)
    }
}

/// Unique identifier of a `Proprietor`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::proprietor::Id)]
#[into(domain::proprietor::Id)]
#[graphql(name = "ProprietorId", transparent)]
pub struct Id(Uuid);

/// Name of a `Proprietor`'s business.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorBusinessName",
    with = scalar::Via::<domain::proprietor::BusinessName>,
)]
pub struct BusinessName(domain::proprietor::BusinessName);

/// Registration number of a `Proprietor`'s business.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorRegistrationNumber",
    with = scalar::Via::<domain::proprietor::RegistrationNumber>,
)]
pub struct RegistrationNumber(domain::proprietor::RegistrationNumber);

define_enum! {
    #[doc = "Status of a `Proprietor`."]
    #[graphql(name = "ProprietorStatus")]
    enum Status for domain::proprietor::Status {
        #[doc = "Owns `Property`s."]
        Active,

        #[doc = "Doesn't participate anymore."]
        Inactive,
    }
}

/// Share of a [`Property`] owned by a [`Proprietor`].
///
/// [`Property`]: api::Property
#[derive(Clone, Debug, From)]
pub struct Ownership(domain::proprietor::Ownership);

impl From<read::Active<domain::proprietor::Ownership>> for Ownership {
    fn from(read::Active(o): read::Active<domain::proprietor::Ownership>) -> Self {
        Self(o)
    }
}

/// Share of a `Property` owned by a `Proprietor`.
#[graphql_object(context = Context)]
impl Ownership {
    /// Unique identifier of this `Ownership`.
    #[must_use]
    pub fn id(&self) -> OwnershipId {
        self.0.id.into()
    }

    /// Owning `Proprietor`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Ownership.proprietor",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proprietor(&self, ctx: &Context) -> Result<Proprietor, Error> {
        ctx.service()
            .execute(query::proprietor::ById::by(self.0.proprietor_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::ProprietorError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Owned `Property`.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Ownership` loaded from repository guarantees \
                      `Property` existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Owned share of the `Property`.
    #[must_use]
    pub fn percentage(&self) -> Percent {
        self.0.percentage
    }

    /// Indicator whether this `Ownership` is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `Ownership` was (re)assigned.
    #[must_use]
    pub fn assigned_at(&self) -> DateTime {
        self.0.assigned_at.coerce()
    }
}

/// Unique identifier of an `Ownership`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::proprietor::ownership::Id)]
#[into(domain::proprietor::ownership::Id)]
#[graphql(name = "OwnershipId", transparent)]
pub struct OwnershipId(Uuid);

/// Periodic report about a [`Property`] sent to its [`Proprietor`].
///
/// [`Property`]: api::Property
#[derive(Clone, Debug, From)]
pub struct Report(domain::proprietor::Report);

/// Periodic report about a `Property` sent to its `Proprietor`.
#[graphql_object(name = "ProprietorReport", context = Context)]
impl Report {
    /// Unique identifier of this `ProprietorReport`.
    #[must_use]
    pub fn id(&self) -> ReportId {
        self.0.id.into()
    }

    /// `Proprietor` this `ProprietorReport` is addressed to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ProprietorReport.proprietor",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proprietor(&self, ctx: &Context) -> Result<Proprietor, Error> {
        ctx.service()
            .execute(query::proprietor::ById::by(self.0.proprietor_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::ProprietorError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `Property` this `ProprietorReport` is about.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Report` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Kind of this `ProprietorReport`.
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        self.0.kind.into()
    }

    /// Title of this `ProprietorReport`.
    #[must_use]
    pub fn title(&self) -> ReportTitle {
        self.0.title.clone().into()
    }

    /// Description of this `ProprietorReport`, if any.
    #[must_use]
    pub fn description(&self) -> Option<ReportDescription> {
        self.0.description.clone().map(Into::into)
    }

    /// Status of this `ProprietorReport`.
    #[must_use]
    pub fn status(&self) -> ReportStatus {
        self.0.status.into()
    }

    /// `User` who prepared this `ProprietorReport`.
    #[must_use]
    pub fn created_by(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Report` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.created_by)
        }
    }

    /// `DateTime` when this `ProprietorReport` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `ProprietorReport` was last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// `DateTime` when this `ProprietorReport` was sent, if it was.
    #[must_use]
    pub fn sent_at(&self) -> Option<DateTime> {
        self.0.sent_at.map(|at| at.coerce())
    }
}

/// Unique identifier of a `ProprietorReport`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::proprietor::report::Id)]
#[into(domain::proprietor::report::Id)]
#[graphql(name = "ProprietorReportId", transparent)]
pub struct ReportId(Uuid);

/// Title of a `ProprietorReport`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorReportTitle",
    with = scalar::Via::<domain::proprietor::report::Title>,
)]
pub struct ReportTitle(domain::proprietor::report::Title);

/// Description of a `ProprietorReport`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorReportDescription",
    with = scalar::Via::<domain::proprietor::report::Description>,
)]
pub struct ReportDescription(domain::proprietor::report::Description);

define_enum! {
    #[doc = "Kind of a `ProprietorReport`."]
    #[graphql(name = "ProprietorReportKind")]
    enum ReportKind for domain::proprietor::report::Kind {
        #[doc = "Monthly summary."]
        Monthly,

        #[doc = "Quarterly summary."]
        Quarterly,

        #[doc = "Annual summary."]
        Annual,

        #[doc = "Occupancy of the `Property`."]
        Occupancy,

        #[doc = "Income and expenses of the `Property`."]
        Financial,

        #[doc = "Maintenance done in the `Property`."]
        Maintenance,
    }
}

define_enum! {
    #[doc = "Status of a `ProprietorReport`."]
    #[graphql(name = "ProprietorReportStatus")]
    enum ReportStatus for domain::proprietor::report::Status {
        #[doc = "Being prepared."]
        Draft,

        #[doc = "Awaits approval."]
        Pending,

        #[doc = "Approved, but not sent yet."]
        Approved,

        #[doc = "Sent to the `Proprietor`."]
        Sent,
    }
}

/// Message sent to a [`Proprietor`] by a super-admin.
#[derive(Clone, Debug, From)]
pub struct Message(domain::proprietor::Message);

/// Message sent to a `Proprietor` by a super-admin.
#[graphql_object(name = "ProprietorMessage", context = Context)]
impl Message {
    /// Unique identifier of this `ProprietorMessage`.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.0.id.into()
    }

    /// `User` who sent this `ProprietorMessage`.
    #[must_use]
    pub fn sender(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Message` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.sender_id)
        }
    }

    /// Subject of this `ProprietorMessage`, if any.
    #[must_use]
    pub fn subject(&self) -> Option<MessageSubject> {
        self.0.subject.clone().map(Into::into)
    }

    /// Text of this `ProprietorMessage`.
    #[must_use]
    pub fn body(&self) -> MessageBody {
        self.0.body.clone().into()
    }

    /// Kind of this `ProprietorMessage`.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.0.kind.into()
    }

    /// Indicator whether the `Proprietor` has read this `ProprietorMessage`.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.0.is_read
    }

    /// `DateTime` when this `ProprietorMessage` was first read.
    #[must_use]
    pub fn read_at(&self) -> Option<DateTime> {
        self.0.read_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `ProprietorMessage` was sent.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `ProprietorMessage`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::proprietor::message::Id)]
#[into(domain::proprietor::message::Id)]
#[graphql(name = "ProprietorMessageId", transparent)]
pub struct MessageId(Uuid);

/// Subject of a `ProprietorMessage`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorMessageSubject",
    with = scalar::Via::<domain::proprietor::message::Subject>,
)]
pub struct MessageSubject(domain::proprietor::message::Subject);

/// Text of a `ProprietorMessage`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProprietorMessageBody",
    with = scalar::Via::<domain::proprietor::message::Body>,
)]
pub struct MessageBody(domain::proprietor::message::Body);

define_enum! {
    #[doc = "Kind of a `ProprietorMessage`."]
    #[graphql(name = "ProprietorMessageKind")]
    enum MessageKind for domain::proprietor::message::Kind {
        #[doc = "Anything."]
        General,

        #[doc = "Something requiring attention."]
        Alert,

        #[doc = "Announcement of a `ProprietorReport`."]
        Report,

        #[doc = "Informational notice."]
        Notification,
    }
}
