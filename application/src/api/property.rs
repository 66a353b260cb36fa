//! [`Property`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, define_enum, AsError, Context, Error};

/// A managed property.
#[derive(Clone, Debug, From)]
pub struct Property {
    /// ID of this [`Property`].
    id: Id,

    /// Underlying [`domain::Property`].
    property: OnceCell<domain::Property>,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        Self {
            id: property.id.into(),
            property: OnceCell::new_with(Some(property)),
        }
    }
}

impl Property {
    /// Creates a new [`Property`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Property`] with the provided ID exists,
    /// otherwise accessing this [`Property`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            property: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Property`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Property`] doesn't exist.
    async fn property(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Property, Error> {
        let id = self.id.into();
        self.property
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::property::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::PropertyError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A managed property.
#[graphql_object(context = Context)]
impl Property {
    /// Unique identifier of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.property(ctx).await?.name.clone().into())
    }

    /// Address of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.property(ctx).await?.address.clone().into())
    }

    /// Description of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.property(ctx).await?.description.clone().map(Into::into))
    }

    /// Kind of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.property(ctx).await?.kind.into())
    }

    /// Status of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.property(ctx).await?.status.into())
    }

    /// `DateTime` when this `Property` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.property(ctx).await?.created_at.coerce())
    }

    /// `Unit`s of this `Property`, ordered by their numbers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.units",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn units(&self, ctx: &Context) -> Result<Vec<Unit>, Error> {
        ctx.service()
            .execute(query::property::Units::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|units| units.into_iter().map(Into::into).collect())
    }

    /// Property manager currently assigned to this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.manager",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn manager(
        &self,
        ctx: &Context,
    ) -> Result<Option<ManagerAssignment>, Error> {
        ctx.service()
            .execute(query::property::Manager::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|a| a.map(|read::Active(a)| a.into()))
    }

    /// `Caretaker` currently looking after this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.caretaker",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn caretaker(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Caretaker>, Error> {
        ctx.service()
            .execute(query::caretaker::OfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// `Technician`s actively serving this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.technicians",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn technicians(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Technician>, Error> {
        ctx.service()
            .execute(query::technician::OfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ts| ts.into_iter().map(Into::into).collect())
    }

    /// Active `Ownership`s of this `Property`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.owners",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owners(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Ownership>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::proprietor::Owners::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// `Lease`s of this `Property`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.leases",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn leases(&self, ctx: &Context) -> Result<Vec<api::Lease>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::lease::OfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ls| ls.into_iter().map(Into::into).collect())
    }

    /// Rent `Payment`s of this `Property`, by due date descending.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::payment::OfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Security `Deposit`s of this `Property`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.deposits",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deposits(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Deposit>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::payment::DepositsOfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ds| ds.into_iter().map(Into::into).collect())
    }

    /// `MaintenanceRequest`s of this `Property`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.maintenanceRequests",
            otel.name = api::Query::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn maintenance_requests(
        &self,
        status: Option<api::maintenance::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceRequest>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::maintenance::OfProperty::by(
                read::maintenance::OfProperty {
                    property_id: self.id.into(),
                    status: status.map(Into::into),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Open `MaintenanceRequest`s of this `Property` waiting for its manager:
    /// the ones no `Technician` could be found for and the escalated ones.
    ///
    /// Oldest escalation (or creation) first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.escalations",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn escalations(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceRequest>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::maintenance::EscalationView::by(
                read::maintenance::EscalationView {
                    property_id: self.id.into(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Caretaker `Duty`s of this `Property`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage this
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.duties",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn duties(&self, ctx: &Context) -> Result<Vec<api::Duty>, Error> {
        _ = ctx.manager_session(self.id.into()).await?;

        ctx.service()
            .execute(query::caretaker::DutiesOfProperty::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ds| ds.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Property`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::property::Id)]
#[into(domain::property::Id)]
#[graphql(name = "PropertyId", transparent)]
pub struct Id(Uuid);

/// Name of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyName",
    with = scalar::Via::<domain::property::Name>,
)]
pub struct Name(domain::property::Name);

/// Address of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyAddress",
    with = scalar::Via::<domain::property::Address>,
)]
pub struct Address(domain::property::Address);

/// Description of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyDescription",
    with = scalar::Via::<domain::property::Description>,
)]
pub struct Description(domain::property::Description);

define_enum! {
    #[doc = "Kind of a `Property`."]
    #[graphql(name = "PropertyKind")]
    enum Kind for domain::property::Kind {
        #[doc = "An apartment building."]
        Apartment,

        #[doc = "A house."]
        House,

        #[doc = "A commercial building."]
        Commercial,

        #[doc = "A land plot."]
        Land,

        #[doc = "Anything else."]
        Other,
    }
}

define_enum! {
    #[doc = "Status of a `Property`."]
    #[graphql(name = "PropertyStatus")]
    enum Status for domain::property::Status {
        #[doc = "In operation."]
        Active,

        #[doc = "Under maintenance."]
        Maintenance,

        #[doc = "Not operated anymore."]
        Inactive,
    }
}

/// A rentable unit of a [`Property`].
#[derive(Clone, Debug, From)]
pub struct Unit(domain::Unit);

/// A rentable unit of a `Property`.
#[graphql_object(context = Context)]
impl Unit {
    /// Unique identifier of this `Unit`.
    #[must_use]
    pub fn id(&self) -> UnitId {
        self.0.id.into()
    }

    /// `Property` this `Unit` belongs to.
    #[must_use]
    pub fn property(&self) -> Property {
        #[expect(
            unsafe_code,
            reason = "`Unit` loaded from repository guarantees `Property` \
                      existence"
        )]
        unsafe {
            Property::new_unchecked(self.0.property_id)
        }
    }

    /// Number of this `Unit` within its `Property`.
    #[must_use]
    pub fn number(&self) -> UnitNumber {
        self.0.number.clone().into()
    }

    /// Monthly rent of this `Unit`.
    #[must_use]
    pub fn monthly_rent(&self) -> Money {
        self.0.monthly_rent
    }

    /// Status of this `Unit`.
    #[must_use]
    pub fn status(&self) -> UnitStatus {
        self.0.status.into()
    }

    /// `DateTime` when this `Unit` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// Active `Lease` of this `Unit`, if it's occupied.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of this `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Unit.activeLease",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn active_lease(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Lease>, Error> {
        _ = ctx.manager_session(self.0.property_id).await?;

        ctx.service()
            .execute(query::lease::ActiveOfUnit::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|l| l.map(|read::Active(l)| l.into()))
    }
}

/// Unique identifier of a `Unit`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::unit::Id)]
#[into(domain::unit::Id)]
#[graphql(name = "UnitId", transparent)]
pub struct UnitId(Uuid);

/// Number of a `Unit` within its `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UnitNumber",
    with = scalar::Via::<domain::unit::Number>,
)]
pub struct UnitNumber(domain::unit::Number);

define_enum! {
    #[doc = "Status of a `Unit`."]
    #[graphql(name = "UnitStatus")]
    enum UnitStatus for domain::unit::Status {
        #[doc = "Free to be leased."]
        Available,

        #[doc = "Leased by a tenant."]
        Occupied,

        #[doc = "Under maintenance."]
        Maintenance,

        #[doc = "Held for a future tenant."]
        Reserved,
    }
}

/// Assignment of a property manager to a [`Property`].
#[derive(Clone, Debug, From)]
pub struct ManagerAssignment(domain::manager::Assignment);

/// Assignment of a property manager to a `Property`.
#[graphql_object(context = Context)]
impl ManagerAssignment {
    /// Unique identifier of this `ManagerAssignment`.
    #[must_use]
    pub fn id(&self) -> ManagerAssignmentId {
        self.0.id.into()
    }

    /// Assigned property manager.
    #[must_use]
    pub fn manager(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "`Assignment` loaded from repository guarantees `User` \
                      existence"
        )]
        unsafe {
            api::User::new_unchecked(self.0.manager_id)
        }
    }

    /// Managed `Property`.
    #[must_use]
    pub fn property(&self) -> Property {
        #[expect(
            unsafe_code,
            reason = "`Assignment` loaded from repository guarantees \
                      `Property` existence"
        )]
        unsafe {
            Property::new_unchecked(self.0.property_id)
        }
    }

    /// Status of this `ManagerAssignment`.
    #[must_use]
    pub fn status(&self) -> ManagerAssignmentStatus {
        self.0.status.into()
    }

    /// `DateTime` when this `ManagerAssignment` was made.
    #[must_use]
    pub fn assigned_at(&self) -> DateTime {
        self.0.assigned_at.coerce()
    }
}

/// Unique identifier of a `ManagerAssignment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::manager::Id)]
#[into(domain::manager::Id)]
#[graphql(name = "ManagerAssignmentId", transparent)]
pub struct ManagerAssignmentId(Uuid);

define_enum! {
    #[doc = "Status of a `ManagerAssignment`."]
    #[graphql(name = "ManagerAssignmentStatus")]
    enum ManagerAssignmentStatus for domain::manager::Status {
        #[doc = "In force."]
        Active,

        #[doc = "Ended by unassigning the manager."]
        Inactive,

        #[doc = "Ended by assigning another manager."]
        Transferred,
    }
}

pub mod list {
    //! Definitions related to the [`Property`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Property};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Property` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::property::list::Cursor)]
    #[graphql(
        name = "PropertyListCursor",
        with = scalar::Via::<read::property::list::Cursor>,
    )]
    pub struct Cursor(pub read::property::list::Cursor);

    /// Edge in the [`Property`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::property::list::Edge);

    /// Edge in the `Property` list.
    #[graphql_object(name = "PropertyListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PropertyListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PropertyListEdge`.
        #[must_use]
        pub fn node(&self) -> Property {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Property` existence"
            )]
            unsafe {
                Property::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Property`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::property::list::Connection);

    /// Connection of the `Property` list.
    #[graphql_object(name = "PropertyListConnection", context = Context)]
    impl Connection {
        /// Edges of this `PropertyListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::property::list::PageInfo`].
        info: read::property::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `PropertyListConnection` page.
    #[graphql_object(name = "PropertyListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Property` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::property::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
