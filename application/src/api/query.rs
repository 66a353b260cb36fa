//! GraphQL [`Query`]s definitions.

use common::money::Currency;
use itertools::Itertools as _;
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither a super-admin
    ///                             nor a property manager and tries to access
    ///                             another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::user::list::Edge, Error> {
        Self::users(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| UserError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `User`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither a super-admin
    ///                             nor a property manager.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "users",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            role = ?role,
            status = ?status,
        ),
    )]
    pub async fn users(
        first: Option<i32>,
        after: Option<api::user::list::Cursor>,
        last: Option<i32>,
        before: Option<api::user::list::Cursor>,
        name: Option<api::user::Name>,
        role: Option<api::user::Role>,
        status: Option<api::user::Status>,
        ctx: &Context,
    ) -> Result<api::user::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::user::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let session = ctx.current_session().await?;
        let is_staff = matches!(
            session.role,
            domain::user::Role::SuperAdmin
                | domain::user::Role::PropertyManager,
        );
        let is_myself = arguments
            .exact_cursor()
            .is_some_and(|id| api::user::Id::from(*id) == session.user_id);
        if !is_staff && !is_myself {
            return Err(api::PrivilegeError::NotAllowed.into())
                .map_err(ctx.error());
        }

        ctx.service()
            .execute(query::users::List::by(read::user::list::Selector {
                arguments,
                filter: read::user::list::Filter {
                    name: name.map(Into::into),
                    role: role.map(Into::into),
                    status: status.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Property` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "property",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::property::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PropertyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Property`s.
    ///
    /// Inactive `Property`s are listed for super-admins only, and only if
    /// `includeInactive` is set.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "properties",
            include_inactive = ?include_inactive,
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn properties(
        first: Option<i32>,
        after: Option<api::property::list::Cursor>,
        last: Option<i32>,
        before: Option<api::property::list::Cursor>,
        name: Option<api::property::Name>,
        include_inactive: Option<bool>,
        ctx: &Context,
    ) -> Result<api::property::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let session = ctx.current_session().await?;
        let include_inactive = include_inactive.unwrap_or_default()
            && session.role == domain::user::Role::SuperAdmin;

        ctx.service()
            .execute(query::property::List::by(
                read::property::list::Selector {
                    arguments: read::property::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::property::list::Filter {
                        name: name.map(Into::into),
                        include_inactive,
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Unit` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "unit",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unit(
        id: api::property::UnitId,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        _ = ctx.current_session().await?;

        unit(id.into(), ctx).await
    }

    /// Returns the `Tenant` record of the currently authenticated `User`, if
    /// they rent a `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myTenancy",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_tenancy(
        ctx: &Context,
    ) -> Result<Option<api::Tenant>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::lease::TenantByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|t| t.map(Into::into))
    }

    /// Returns the `Lease` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEASE_NOT_EXISTS` - the `Lease` with the specified ID does not
    ///                        exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` is neither the `Tenant`
    ///                             of the `Lease` nor manages its `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "lease",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn lease(
        id: api::lease::Id,
        ctx: &Context,
    ) -> Result<api::Lease, Error> {
        let lease = fetch_lease(id.into(), ctx).await?;
        authorize_tenant_or_manager(lease.tenant_id, lease.property_id, ctx)
            .await?;
        Ok(lease.into())
    }

    /// Returns the `Payment` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` is neither the charged
    ///                             `Tenant` nor manages the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "payment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payment(
        id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let payment = ctx
            .service()
            .execute(query::payment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PaymentError::NotExists.into())
            .map_err(ctx.error())?;
        authorize_tenant_or_manager(
            payment.tenant_id,
            payment.property_id,
            ctx,
        )
        .await?;
        Ok(payment.into())
    }

    /// Returns the `Deposit` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEPOSIT_NOT_EXISTS` - the `Deposit` with the specified ID does not
    ///                          exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` is neither the `Tenant`
    ///                             who deposited nor manages the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deposit",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deposit(
        id: api::payment::DepositId,
        ctx: &Context,
    ) -> Result<api::Deposit, Error> {
        let deposit = ctx
            .service()
            .execute(query::payment::DepositById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| DepositError::NotExists.into())
            .map_err(ctx.error())?;
        authorize_tenant_or_manager(
            deposit.tenant_id,
            deposit.property_id,
            ctx,
        )
        .await?;
        Ok(deposit.into())
    }

    /// Returns the `MaintenanceRequest` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      specified ID does not exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` neither reported the
    ///                             `MaintenanceRequest`, nor is assigned to
    ///                             it, nor manages its `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "maintenanceRequest",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn maintenance_request(
        id: api::maintenance::Id,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let session = ctx.current_session().await?;
        let request = ctx
            .service()
            .execute(query::maintenance::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| MaintenanceRequestError::NotExists.into())
            .map_err(ctx.error())?;

        if api::user::Id::from(request.reporter_id) == session.user_id {
            return Ok(request.into());
        }
        if let Some(technician_id) = request.technician_id {
            let me = ctx
                .service()
                .execute(query::technician::ByUserId::by(
                    session.user_id.into(),
                ))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?;
            if me.is_some_and(|t| t.id == technician_id) {
                return Ok(request.into());
            }
        }
        _ = ctx.manager_session(request.property_id).await?;
        Ok(request.into())
    }

    /// Returns the `MaintenanceRequest`s reported by the currently
    /// authenticated `User`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myMaintenanceRequests",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_maintenance_requests(
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceRequest>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::maintenance::ReportedBy::by(
                read::maintenance::ReportedBy(my_id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Technician` profile of the currently authenticated
    /// `User`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myTechnician",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_technician(
        ctx: &Context,
    ) -> Result<Option<api::Technician>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::technician::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|t| t.map(Into::into))
    }

    /// Returns the jobs of the currently authenticated `Technician`, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_TECHNICIAN` - the current `User` is not a registered
    ///                                `Technician`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myJobs",
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn my_jobs(
        status: Option<api::maintenance::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceRequest>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let technician = ctx
            .service()
            .execute(query::technician::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Technician.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::maintenance::AssignedTo::by(
                read::maintenance::AssignedTo {
                    technician_id: technician.id,
                    status: status.map(Into::into),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Returns the active `TechnicianCategory`s ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "technicianCategories",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn technician_categories(
        ctx: &Context,
    ) -> Result<Vec<api::technician::Category>, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::technician::ActiveCategories::by(
                read::technician::ActiveCategories,
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Caretaker` profile of the currently authenticated `User`,
    /// if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myCaretaker",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_caretaker(
        ctx: &Context,
    ) -> Result<Option<api::Caretaker>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::caretaker::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// Returns the active `ManagerAssignment`s of the currently authenticated
    /// property manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myManagedProperties",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_managed_properties(
        ctx: &Context,
    ) -> Result<Vec<api::property::ManagerAssignment>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::property::ManagedBy::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|asgs| asgs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Caretaker`s supervised by the property manager with the
    /// specified ID (or by the currently authenticated `User`, if omitted).
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_SUPERVISOR` - the current `User` is not a property
    ///                                manager;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` requests
    ///                                 `Caretaker`s of another manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "caretakers",
            manager_id = ?manager_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn caretakers(
        manager_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Caretaker>, Error> {
        let session = ctx.current_session().await?;
        let manager_id = match manager_id {
            Some(id) if id != session.user_id => {
                _ = ctx.super_admin_session().await?;
                id
            }
            Some(_) | None => {
                if session.role != domain::user::Role::PropertyManager {
                    return Err(api::PrivilegeError::Supervisor.into())
                        .map_err(ctx.error());
                }
                session.user_id
            }
        };

        ctx.service()
            .execute(query::caretaker::OfManager::by(manager_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Duty` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUTY_NOT_EXISTS` - the `Duty` with the specified ID does not exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` is neither the
    ///                             responsible `Caretaker` nor manages the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "duty",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn duty(
        id: api::caretaker::DutyId,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let duty = ctx
            .service()
            .execute(query::caretaker::DutyById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| DutyError::NotExists.into())
            .map_err(ctx.error())?;

        let me = ctx
            .service()
            .execute(query::caretaker::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        if !me.is_some_and(|c| c.id == duty.caretaker_id) {
            _ = ctx.manager_session(duty.property_id).await?;
        }
        Ok(duty.into())
    }

    /// Returns the `Proprietor` profile of the currently authenticated `User`,
    /// if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProprietor",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_proprietor(
        ctx: &Context,
    ) -> Result<Option<api::Proprietor>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::proprietor::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.map(Into::into))
    }

    /// Gathers `DashboardStats` over the `Property`s visible to the currently
    /// authenticated `User`:
    /// - all of them for super-admins;
    /// - the managed ones for property managers;
    /// - the owned ones for proprietors.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_PROPRIETOR` - the current `User` has the proprietor
    ///                                role, but no `Proprietor` profile;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` has no access to any
    ///                             dashboard.
    #[tracing::instrument(
        skip_all,
        fields(
            currency = ?currency,
            gql.name = "dashboard",
            otel.name = Self::SPAN_NAME,
            trend_months = ?trend_months,
        ),
    )]
    pub async fn dashboard(
        currency: Option<api::dashboard::Currency>,
        trend_months: Option<i32>,
        ctx: &Context,
    ) -> Result<api::dashboard::Stats, Error> {
        const DEFAULT_TREND_MONTHS: u32 = 6;
        const MAX_TREND_MONTHS: u32 = 24;

        let session = ctx.current_session().await?;
        let scope = match session.role {
            domain::user::Role::SuperAdmin => read::dashboard::Scope::All,
            domain::user::Role::PropertyManager => {
                read::dashboard::Scope::ManagedBy(session.user_id.into())
            }
            domain::user::Role::Proprietor => {
                let proprietor = ctx
                    .service()
                    .execute(query::proprietor::ByUserId::by(
                        session.user_id.into(),
                    ))
                    .await
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())?
                    .ok_or_else(|| api::PrivilegeError::Proprietor.into())
                    .map_err(ctx.error())?;
                read::dashboard::Scope::OwnedBy(proprietor.id)
            }
            domain::user::Role::Tenant
            | domain::user::Role::Caretaker
            | domain::user::Role::Technician => {
                return Err(api::PrivilegeError::NotAllowed.into())
                    .map_err(ctx.error());
            }
        };
        let trend_months = trend_months
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_TREND_MONTHS)
            .clamp(1, MAX_TREND_MONTHS);

        ctx.service()
            .execute(query::Dashboard {
                scope,
                currency: currency.map_or_else(Currency::default, Into::into),
                trend_months,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Fetches the [`api::Unit`] with the provided ID.
///
/// # Errors
///
/// Errors if the [`api::Unit`] doesn't exist.
pub(crate) async fn unit(
    id: domain::unit::Id,
    ctx: &Context,
) -> Result<api::Unit, Error> {
    ctx.service()
        .execute(query::property::UnitById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .ok_or_else(|| UnitError::NotExists.into())
        .map_err(ctx.error())
        .map(Into::into)
}

/// Fetches the [`api::Lease`] with the provided ID.
///
/// # Errors
///
/// Errors if the [`api::Lease`] doesn't exist.
pub(crate) async fn lease(
    id: domain::lease::Id,
    ctx: &Context,
) -> Result<api::Lease, Error> {
    fetch_lease(id, ctx).await.map(Into::into)
}

/// Fetches the [`domain::Lease`] with the provided ID.
async fn fetch_lease(
    id: domain::lease::Id,
    ctx: &Context,
) -> Result<domain::Lease, Error> {
    ctx.service()
        .execute(query::lease::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .ok_or_else(|| LeaseError::NotExists.into())
        .map_err(ctx.error())
}

/// Checks that the current [`Session`] belongs either to the [`Tenant`] with
/// the provided ID or to a manager of the [`Property`] with the provided ID.
///
/// [`Property`]: api::Property
/// [`Session`]: crate::Session
/// [`Tenant`]: api::Tenant
async fn authorize_tenant_or_manager(
    tenant_id: domain::tenant::Id,
    property_id: domain::property::Id,
    ctx: &Context,
) -> Result<(), Error> {
    let my_id = ctx.current_session().await?.user_id;
    let tenant = ctx
        .service()
        .execute(query::lease::TenantById::by(tenant_id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?;
    if tenant.is_some_and(|t| api::user::Id::from(t.user_id) == my_id) {
        return Ok(());
    }
    ctx.manager_session(property_id).await.map(drop)
}

define_error! {
    enum CaretakerError {
        #[code = "CARETAKER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Caretaker` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum DepositError {
        #[code = "DEPOSIT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Deposit` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum DutyError {
        #[code = "DUTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Duty` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LeaseError {
        #[code = "LEASE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Lease` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum MaintenanceRequestError {
        #[code = "MAINTENANCE_REQUEST_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`MaintenanceRequest` with the specified ID does not \
                     exist"]
        NotExists,
    }
}

define_error! {
    enum PaymentError {
        #[code = "PAYMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Payment` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ProprietorError {
        #[code = "PROPRIETOR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Proprietor` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum TechnicianError {
        #[code = "TECHNICIAN_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Technician` with the specified ID does not exist"]
        NotExists,

        #[code = "TECHNICIAN_CATEGORY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`TechnicianCategory` with the specified ID does not \
                     exist"]
        CategoryNotExists,
    }
}

define_error! {
    enum TenantError {
        #[code = "TENANT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Tenant` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UnitError {
        #[code = "UNIT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Unit` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
