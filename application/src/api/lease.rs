//! [`Lease`] and [`Tenant`] definitions.

use common::{DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{command, domain, query};
use uuid::Uuid;

use crate::{api, define_enum, AsError, Context, Error};

/// Occupancy of a unit by a tenant `User`.
#[derive(Clone, Debug, From)]
pub struct Tenant(domain::Tenant);

/// Occupancy of a `Unit` by a tenant `User`.
#[graphql_object(context = Context)]
impl Tenant {
    /// Unique identifier of this `Tenant`.
    #[must_use]
    pub fn id(&self) -> TenantId {
        self.0.id.into()
    }

    /// `User` renting the `Unit`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Tenant` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// `Property` of the rented `Unit`.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Tenant` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Rented `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Tenant.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit(&self, ctx: &Context) -> Result<api::Unit, Error> {
        api::query::unit(self.0.unit_id, ctx).await
    }

    /// Status of this `Tenant`.
    #[must_use]
    pub fn status(&self) -> TenantStatus {
        self.0.status.into()
    }

    /// `DateTime` when this `Tenant` moved in.
    #[must_use]
    pub fn moved_in_at(&self) -> DateTime {
        self.0.moved_in_at.coerce()
    }

    /// `DateTime` when this `Tenant` moved out.
    #[must_use]
    pub fn moved_out_at(&self) -> Option<DateTime> {
        self.0.moved_out_at.map(|at| at.coerce())
    }

    /// `Lease`s of this `Tenant`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Tenant.leases",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn leases(&self, ctx: &Context) -> Result<Vec<Lease>, Error> {
        ctx.service()
            .execute(query::lease::OfTenant::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ls| ls.into_iter().map(Into::into).collect())
    }

    /// Rent `Payment`s of this `Tenant`, by due date descending.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Tenant.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::payment::OfTenant::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Tenant`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::tenant::Id)]
#[into(domain::tenant::Id)]
#[graphql(name = "TenantId", transparent)]
pub struct TenantId(Uuid);

define_enum! {
    #[doc = "Status of a `Tenant`."]
    #[graphql(name = "TenantStatus")]
    enum TenantStatus for domain::tenant::Status {
        #[doc = "Lives in the `Unit`."]
        Active,

        #[doc = "Is about to move in."]
        Pending,

        #[doc = "Has given a notice to move out."]
        NoticeGiven,

        #[doc = "Has moved out."]
        Inactive,
    }
}

/// Rental agreement of a [`Tenant`].
#[derive(Clone, Debug, From)]
pub struct Lease(domain::Lease);

/// Rental agreement of a `Tenant`.
#[graphql_object(context = Context)]
impl Lease {
    /// Unique identifier of this `Lease`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Tenant` of this `Lease`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lease.tenant",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant(&self, ctx: &Context) -> Result<Tenant, Error> {
        ctx.service()
            .execute(query::lease::TenantById::by(self.0.tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::TenantError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `Property` of the leased `Unit`.
    #[must_use]
    pub fn property(&self) -> api::Property {
        #[expect(
            unsafe_code,
            reason = "`Lease` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            api::Property::new_unchecked(self.0.property_id)
        }
    }

    /// Leased `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lease.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit(&self, ctx: &Context) -> Result<api::Unit, Error> {
        api::query::unit(self.0.unit_id, ctx).await
    }

    /// Monthly rent agreed in this `Lease`.
    #[must_use]
    pub fn monthly_rent(&self) -> Money {
        self.0.monthly_rent
    }

    /// Status of this `Lease`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Lease` starts.
    #[must_use]
    pub fn starts_at(&self) -> DateTime {
        self.0.starts_at.coerce()
    }

    /// `DateTime` when this `Lease` ends.
    #[must_use]
    pub fn ends_at(&self) -> DateTime {
        self.0.ends_at.coerce()
    }

    /// `DateTime` when this `Lease` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Lease` was terminated.
    #[must_use]
    pub fn terminated_at(&self) -> Option<DateTime> {
        self.0.terminated_at.map(|at| at.coerce())
    }
}

/// Unique identifier of a `Lease`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::lease::Id)]
#[into(domain::lease::Id)]
#[graphql(name = "LeaseId", transparent)]
pub struct Id(Uuid);

define_enum! {
    #[doc = "Status of a `Lease`."]
    #[graphql(name = "LeaseStatus")]
    enum Status for domain::lease::Status {
        #[doc = "In force."]
        Active,

        #[doc = "Signed, but not started yet."]
        Pending,

        #[doc = "Ended by its term."]
        Expired,

        #[doc = "Ended before its term."]
        Terminated,
    }
}

/// Result of a `Lease` creation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CreateLeaseResult")]
pub struct CreateResult {
    /// Created `Lease`.
    pub lease: Lease,

    /// `Tenant` of the created `Lease`.
    pub tenant: Tenant,
}

impl From<command::create_lease::Output> for CreateResult {
    fn from(output: command::create_lease::Output) -> Self {
        let command::create_lease::Output { lease, tenant } = output;
        Self {
            lease: lease.into(),
            tenant: tenant.into(),
        }
    }
}
