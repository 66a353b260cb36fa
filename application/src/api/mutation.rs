//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money, Percent, Rating};
use juniper::{graphql_object, Nullable};
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `User` with the provided credentials and contact info.
    ///
    /// The registered `User` awaits approval of a super-admin before signing
    /// in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`;
    /// - `ROLE_FORBIDDEN` - provided `UserRole` cannot be self-registered.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "registerUser",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
            role = ?role,
        ),
    )]
    pub async fn register_user(
        name: api::user::Name,
        email: api::user::Email,
        phone: Option<api::user::Phone>,
        password: api::user::Password,
        role: api::user::Role,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(command::RegisterUser {
                name: name.into(),
                email: email.into(),
                phone: phone.map(Into::into),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                role: role.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`;
    /// - `USER_NOT_ACTIVE` - the `User` is not approved yet or is suspended.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Updates the current `User`'s profile with the provided values.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "updateUserProfile",
            name = ?name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn update_user_profile(
        name: Option<api::user::Name>,
        email: Option<api::user::Email>,
        phone: Nullable<api::user::Phone>,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserProfile {
                user_id: my_id.into(),
                name: name.map(Into::into),
                email: email.map(Into::into),
                phone: phone.explicit().map(|p| p.map(Into::into)),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the current `User`'s password to the provided one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_PASSWORD` - provided `old_password` does not match the current
    ///                      `User` password.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserPassword",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user_password(
        new_password: api::user::Password,
        old_password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserPassword {
                user_id: my_id.into(),
                new_password: secrecy::SecretBox::init_with(move || {
                    new_password.into()
                }),
                old_password: secrecy::SecretBox::init_with(move || {
                    old_password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves, suspends or reactivates the `User` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_SELF_UPDATE` - the current `User` tries to update themselves;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserStatus",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            user_id = %user_id,
        ),
    )]
    pub async fn update_user_status(
        user_id: api::user::Id,
        status: api::user::Status,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserStatus {
                user_id: user_id.into(),
                status: status.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Property` with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            address = %address,
            gql.name = "createProperty",
            kind = ?kind,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_property(
        name: api::property::Name,
        address: api::property::Address,
        description: Option<api::property::Description>,
        kind: api::property::Kind,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateProperty {
                name: name.into(),
                address: address.into(),
                description: description.map(Into::into),
                kind: kind.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            address = ?address,
            gql.name = "updateProperty",
            kind = ?kind,
            name = ?name,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            status = ?status,
        ),
    )]
    pub async fn update_property(
        property_id: api::property::Id,
        name: Option<api::property::Name>,
        address: Option<api::property::Address>,
        description: Nullable<api::property::Description>,
        kind: Option<api::property::Kind>,
        status: Option<api::property::Status>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateProperty {
                property_id: property_id.into(),
                name: name.map(Into::into),
                address: address.map(Into::into),
                description: description
                    .explicit()
                    .map(|d| d.map(Into::into)),
                kind: kind.map(Into::into),
                status: status.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the property manager `User` with the provided ID to manage the
    /// `Property` with the provided ID.
    ///
    /// The previous manager of the `Property` (if any) is transferred.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_NOT_PROPERTY_MANAGER` - the `User` is not an active property
    ///                                 manager;
    /// - `MANAGER_ALREADY_ASSIGNED` - the `User` manages the `Property`
    ///                                already;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "assignPropertyManager",
            manager_id = %manager_id,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn assign_property_manager(
        property_id: api::property::Id,
        manager_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::property::ManagerAssignment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AssignPropertyManager {
                property_id: property_id.into(),
                manager_id: manager_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Ends the active manager assignment of the `Property` with the provided
    /// ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MANAGER_NOT_ASSIGNED` - the `Property` has no active manager;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unassignPropertyManager",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn unassign_property_manager(
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::property::ManagerAssignment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UnassignPropertyManager {
                property_id: property_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Unit` in the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `UNIT_NUMBER_OCCUPIED` - the `Property` has a `Unit` with the
    ///                            provided number already;
    /// - `NON_POSITIVE_AMOUNT` - provided `monthlyRent` is not positive;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUnit",
            monthly_rent = %monthly_rent,
            number = %number,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn create_unit(
        property_id: api::property::Id,
        number: api::property::UnitNumber,
        monthly_rent: Money,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateUnit {
                property_id: property_id.into(),
                number: number.into(),
                monthly_rent,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Unit` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the provided ID does not exist;
    /// - `UNIT_STATUS_MANAGED_BY_LEASE` - the `Unit` status is switched from
    ///                                    or to occupied, which is done by
    ///                                    `Lease`s only;
    /// - `NON_POSITIVE_AMOUNT` - provided `monthlyRent` is not positive;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUnit",
            monthly_rent = ?monthly_rent.map(|m| m.to_string()),
            otel.name = Self::SPAN_NAME,
            status = ?status,
            unit_id = %unit_id,
        ),
    )]
    pub async fn update_unit(
        unit_id: api::property::UnitId,
        monthly_rent: Option<Money>,
        status: Option<api::property::UnitStatus>,
        ctx: &Context,
    ) -> Result<api::Unit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUnit {
                unit_id: unit_id.into(),
                monthly_rent,
                status: status.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Leases the `Unit` with the provided ID to the tenant `User` with the
    /// provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the provided ID does not exist;
    /// - `UNIT_NOT_AVAILABLE` - the `Unit` is not available for lease;
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_NOT_TENANT` - the `User` is not an active tenant;
    /// - `TENANT_OCCUPIED` - the `User` already leases a `Unit`;
    /// - `INVALID_LEASE_TERM` - `endsAt` is not after `startsAt`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Unit`.
    #[tracing::instrument(
        skip_all,
        fields(
            ends_at = %ends_at.to_rfc3339(),
            gql.name = "createLease",
            otel.name = Self::SPAN_NAME,
            starts_at = %starts_at.to_rfc3339(),
            unit_id = %unit_id,
            user_id = %user_id,
        ),
    )]
    pub async fn create_lease(
        user_id: api::user::Id,
        unit_id: api::property::UnitId,
        starts_at: DateTime,
        ends_at: DateTime,
        ctx: &Context,
    ) -> Result<api::lease::CreateResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateLease {
                user_id: user_id.into(),
                unit_id: unit_id.into(),
                starts_at: starts_at.coerce(),
                ends_at: ends_at.coerce(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Terminates the active `Lease` with the provided ID, freeing its
    /// `Unit`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEASE_NOT_EXISTS` - the `Lease` with the provided ID does not exist;
    /// - `LEASE_NOT_ACTIVE` - the `Lease` is not active;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Lease`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "terminateLease",
            lease_id = %lease_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn terminate_lease(
        lease_id: api::lease::Id,
        ctx: &Context,
    ) -> Result<api::Lease, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::TerminateLease {
                lease_id: lease_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Charges the monthly rent of the `Lease` with the provided ID.
    ///
    /// The `Lease`'s monthly rent is charged if no `amount` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEASE_NOT_EXISTS` - the `Lease` with the provided ID does not exist;
    /// - `LEASE_NOT_ACTIVE` - the `Lease` is not active;
    /// - `NON_POSITIVE_AMOUNT` - provided `amount` is not positive;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Lease`.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = ?amount.map(|m| m.to_string()),
            due_at = %due_at.to_rfc3339(),
            gql.name = "createRentCharge",
            lease_id = %lease_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_rent_charge(
        lease_id: api::lease::Id,
        amount: Option<Money>,
        due_at: DateTime,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateRentCharge {
                lease_id: lease_id.into(),
                amount,
                due_at: due_at.coerce(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records a (partial) payment of the rent `Payment` with the provided
    /// ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the provided ID does not
    ///                          exist;
    /// - `PAYMENT_SETTLED` - the `Payment` is paid or waived already;
    /// - `CURRENCY_MISMATCH` - provided `amount` is in another currency;
    /// - `NON_POSITIVE_AMOUNT` - provided `amount` is not positive;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither the charged
    ///                             `Tenant` nor manages the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "recordRentPayment",
            method = ?method,
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
            reference = ?reference,
        ),
    )]
    pub async fn record_rent_payment(
        payment_id: api::payment::Id,
        amount: Money,
        method: api::payment::Method,
        reference: Option<api::payment::Reference>,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RecordRentPayment {
                payment_id: payment_id.into(),
                amount,
                method: method.into(),
                reference: reference.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Waives the unsettled rent `Payment` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the provided ID does not
    ///                          exist;
    /// - `PAYMENT_SETTLED` - the `Payment` is paid or waived already;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "waiveRentPayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn waive_rent_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::WaiveRentPayment {
                payment_id: payment_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Collects a security `Deposit` for the `Lease` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEASE_NOT_EXISTS` - the `Lease` with the provided ID does not exist;
    /// - `LEASE_NOT_ACTIVE` - the `Lease` is not active;
    /// - `NON_POSITIVE_AMOUNT` - provided `amount` is not positive;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Lease`.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "collectSecurityDeposit",
            lease_id = %lease_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn collect_security_deposit(
        lease_id: api::lease::Id,
        amount: Money,
        ctx: &Context,
    ) -> Result<api::Deposit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CollectSecurityDeposit {
                lease_id: lease_id.into(),
                amount,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Releases the held security `Deposit` with the provided ID, refunding
    /// the provided amount to the `Tenant`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEPOSIT_NOT_EXISTS` - the `Deposit` with the provided ID does not
    ///                          exist;
    /// - `DEPOSIT_NOT_HELD` - the `Deposit` is released already;
    /// - `INVALID_REFUND` - provided `refund` is negative or exceeds the
    ///                      `Deposit`;
    /// - `CURRENCY_MISMATCH` - provided `refund` is in another currency;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property` of the `Deposit`.
    #[tracing::instrument(
        skip_all,
        fields(
            deposit_id = %deposit_id,
            gql.name = "releaseSecurityDeposit",
            otel.name = Self::SPAN_NAME,
            reason = ?reason,
            refund = %refund,
        ),
    )]
    pub async fn release_security_deposit(
        deposit_id: api::payment::DepositId,
        refund: Money,
        reason: Option<api::payment::DepositReason>,
        ctx: &Context,
    ) -> Result<api::Deposit, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::ReleaseSecurityDeposit {
                deposit_id: deposit_id.into(),
                refund,
                reason: reason.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reports a new `MaintenanceRequest` for the `Property` with the
    /// provided ID.
    ///
    /// `Technician`s serving the `Property` (and matching the category, if
    /// provided) are notified about it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `UNIT_NOT_EXISTS` - the `Unit` with the provided ID does not exist in
    ///                       the `Property`;
    /// - `TECHNICIAN_CATEGORY_NOT_EXISTS` - the `TechnicianCategory` with the
    ///                                      provided ID does not exist;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` can't report issues of
    ///                             the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = ?category_id,
            gql.name = "createMaintenanceRequest",
            otel.name = Self::SPAN_NAME,
            priority = ?priority,
            property_id = %property_id,
            title = %title,
            unit_id = ?unit_id,
        ),
    )]
    pub async fn create_maintenance_request(
        property_id: api::property::Id,
        unit_id: Option<api::property::UnitId>,
        category_id: Option<api::technician::CategoryId>,
        title: api::maintenance::Title,
        description: api::maintenance::Description,
        priority: api::maintenance::Priority,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateMaintenanceRequest {
                property_id: property_id.into(),
                unit_id: unit_id.map(Into::into),
                category_id: category_id.map(Into::into),
                title: title.into(),
                description: description.into(),
                priority: priority.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the `MaintenanceRequest` with the provided ID to the
    /// `Technician` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `MAINTENANCE_REQUEST_CLOSED` - the `MaintenanceRequest` is completed
    ///                                  or cancelled;
    /// - `TECHNICIAN_NOT_SERVING` - the `Technician` doesn't serve the
    ///                              `Property`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            deadline = ?deadline.as_ref().map(DateTime::to_rfc3339),
            gql.name = "assignMaintenanceRequest",
            otel.name = Self::SPAN_NAME,
            request_id = %request_id,
            technician_id = %technician_id,
        ),
    )]
    pub async fn assign_maintenance_request(
        request_id: api::maintenance::Id,
        technician_id: api::technician::Id,
        deadline: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AssignMaintenanceRequest {
                request_id: request_id.into(),
                technician_id: technician_id.into(),
                deadline: deadline.map(DateTime::coerce),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the `MaintenanceRequest` with the provided ID to the best
    /// available `Technician` serving its `Property`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `MAINTENANCE_REQUEST_ASSIGNED` - the `MaintenanceRequest` is assigned
    ///                                    already;
    /// - `NO_TECHNICIAN_AVAILABLE` - no available `Technician` serves the
    ///                               `Property`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "autoAssignMaintenanceRequest",
            otel.name = Self::SPAN_NAME,
            request_id = %request_id,
        ),
    )]
    pub async fn auto_assign_maintenance_request(
        request_id: api::maintenance::Id,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AutoAssignMaintenanceRequest {
                request_id: request_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `MaintenanceRequest` with the provided ID to the provided
    /// status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `MaintenanceRequest` can't move to
    ///                                 the provided status;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither the assigned
    ///                             `Technician` nor manages the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateMaintenanceRequestStatus",
            otel.name = Self::SPAN_NAME,
            request_id = %request_id,
            status = ?status,
        ),
    )]
    pub async fn update_maintenance_request_status(
        request_id: api::maintenance::Id,
        status: api::maintenance::Status,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateMaintenanceRequestStatus {
                request_id: request_id.into(),
                status: status.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Escalates the `MaintenanceRequest` with the provided ID to the
    /// property manager.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `MaintenanceRequest` is closed;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither the reporter
    ///                             nor the assigned `Technician`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "escalateMaintenanceRequest",
            otel.name = Self::SPAN_NAME,
            reason = ?reason,
            request_id = %request_id,
        ),
    )]
    pub async fn escalate_maintenance_request(
        request_id: api::maintenance::Id,
        reason: Option<api::maintenance::Reason>,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::EscalateMaintenanceRequest {
                request_id: request_id.into(),
                reason: reason.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rates the completed `MaintenanceRequest` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `MAINTENANCE_REQUEST_NOT_COMPLETED` - the `MaintenanceRequest` is not
    ///                                         completed yet;
    /// - `MAINTENANCE_REQUEST_RATED` - the `MaintenanceRequest` is rated
    ///                                 already;
    /// - `PRIVILEGE_NOT_REPORTER` - the current `User` is not the reporter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rateMaintenanceRequest",
            otel.name = Self::SPAN_NAME,
            rating = %rating,
            request_id = %request_id,
        ),
    )]
    pub async fn rate_maintenance_request(
        request_id: api::maintenance::Id,
        rating: Rating,
        ctx: &Context,
    ) -> Result<api::MaintenanceRequest, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RateMaintenanceRequest {
                request_id: request_id.into(),
                rating,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `TechnicianCategory`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TECHNICIAN_CATEGORY_NAME_OCCUPIED` - provided name is occupied by
    ///                                         another `TechnicianCategory`;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createTechnicianCategory",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_technician_category(
        name: api::technician::CategoryName,
        description: Option<api::technician::CategoryDescription>,
        ctx: &Context,
    ) -> Result<api::technician::Category, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateTechnicianCategory {
                name: name.into(),
                description: description.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `TechnicianCategory` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TECHNICIAN_CATEGORY_NOT_EXISTS` - the `TechnicianCategory` with the
    ///                                      provided ID does not exist;
    /// - `TECHNICIAN_CATEGORY_NAME_OCCUPIED` - provided name is occupied by
    ///                                         another `TechnicianCategory`;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = %category_id,
            gql.name = "updateTechnicianCategory",
            is_active = ?is_active,
            name = ?name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_technician_category(
        category_id: api::technician::CategoryId,
        name: Option<api::technician::CategoryName>,
        description: Nullable<api::technician::CategoryDescription>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::technician::Category, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateTechnicianCategory {
                category_id: category_id.into(),
                name: name.map(Into::into),
                description: description
                    .explicit()
                    .map(|d| d.map(Into::into)),
                is_active,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers the technician `User` with the provided ID in the
    /// `TechnicianCategory` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_ROLE_MISMATCH` - the `User` is not a technician;
    /// - `ALREADY_REGISTERED` - the `User` is registered already;
    /// - `TECHNICIAN_CATEGORY_NOT_EXISTS` - the `TechnicianCategory` with the
    ///                                      provided ID does not exist or is
    ///                                      inactive;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = %category_id,
            gql.name = "registerTechnician",
            otel.name = Self::SPAN_NAME,
            user_id = %user_id,
        ),
    )]
    pub async fn register_technician(
        user_id: api::user::Id,
        category_id: api::technician::CategoryId,
        ctx: &Context,
    ) -> Result<api::Technician, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RegisterTechnician {
                user_id: user_id.into(),
                category_id: category_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Switches whether the current `Technician` takes new jobs.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRIVILEGE_NOT_TECHNICIAN` - the current `User` is not a registered
    ///                                `Technician`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateTechnicianAvailability",
            is_available = %is_available,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_technician_availability(
        is_available: bool,
        ctx: &Context,
    ) -> Result<api::Technician, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateTechnicianAvailability {
                is_available,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the `Technician` with the provided ID to serve the `Property`
    /// with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TECHNICIAN_NOT_EXISTS` - the `Technician` with the provided ID does
    ///                             not exist;
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `TECHNICIAN_ALREADY_ASSIGNED` - the `Technician` serves the
    ///                                   `Property` already;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "assignTechnicianToProperty",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            technician_id = %technician_id,
        ),
    )]
    pub async fn assign_technician_to_property(
        technician_id: api::technician::Id,
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::technician::Assignment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AssignTechnicianToProperty {
                technician_id: technician_id.into(),
                property_id: property_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Stops the `Technician` with the provided ID serving the `Property`
    /// with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TECHNICIAN_NOT_ASSIGNED` - the `Technician` doesn't serve the
    ///                               `Property`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unassignTechnicianFromProperty",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            technician_id = %technician_id,
        ),
    )]
    pub async fn unassign_technician_from_property(
        technician_id: api::technician::Id,
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::technician::Assignment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UnassignTechnicianFromProperty {
                technician_id: technician_id.into(),
                property_id: property_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers the caretaker `User` with the provided ID, supervised by the
    /// property manager with the provided ID.
    ///
    /// Property managers register caretakers supervised by themselves.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_ROLE_MISMATCH` - the `User` is not a caretaker, or the
    ///                          supervisor is not a property manager;
    /// - `ALREADY_REGISTERED` - the `User` is registered already;
    /// - `PRIVILEGE_NOT_ALLOWED` - the current `User` is neither a super-admin
    ///                             nor a property manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "registerCaretaker",
            manager_id = ?manager_id,
            otel.name = Self::SPAN_NAME,
            user_id = %user_id,
        ),
    )]
    pub async fn register_caretaker(
        user_id: api::user::Id,
        manager_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Caretaker, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RegisterCaretaker {
                user_id: user_id.into(),
                manager_id: manager_id.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the `Caretaker` with the provided ID to look after the
    /// `Property` with the provided ID.
    ///
    /// The previous `Caretaker` of the `Property` (if any) is unassigned.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CARETAKER_NOT_EXISTS` - the `Caretaker` with the provided ID does
    ///                            not exist;
    /// - `CARETAKER_SUSPENDED` - the `Caretaker` is suspended;
    /// - `CARETAKER_ALREADY_ASSIGNED` - the `Caretaker` looks after the
    ///                                  `Property` already;
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            caretaker_id = %caretaker_id,
            gql.name = "assignCaretaker",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn assign_caretaker(
        caretaker_id: api::caretaker::Id,
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Caretaker, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AssignCaretaker {
                caretaker_id: caretaker_id.into(),
                property_id: property_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Unassigns the `Caretaker` of the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CARETAKER_NOT_ASSIGNED` - the `Property` has no `Caretaker`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unassignCaretaker",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn unassign_caretaker(
        property_id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Caretaker, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UnassignCaretaker {
                property_id: property_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the status or the performance rating of the `Caretaker` with
    /// the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CARETAKER_NOT_EXISTS` - the `Caretaker` with the provided ID does
    ///                            not exist;
    /// - `PRIVILEGE_NOT_SUPERVISOR` - the current `User` doesn't supervise the
    ///                                `Caretaker`.
    #[tracing::instrument(
        skip_all,
        fields(
            caretaker_id = %caretaker_id,
            gql.name = "updateCaretaker",
            otel.name = Self::SPAN_NAME,
            performance_rating = ?performance_rating,
            status = ?status,
        ),
    )]
    pub async fn update_caretaker(
        caretaker_id: api::caretaker::Id,
        status: Option<api::caretaker::Status>,
        performance_rating: Option<Rating>,
        ctx: &Context,
    ) -> Result<api::Caretaker, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateCaretaker {
                caretaker_id: caretaker_id.into(),
                status: status.map(Into::into),
                performance_rating,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Gives a new `Duty` to the `Caretaker` with the provided ID at their
    /// current `Property`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CARETAKER_NOT_EXISTS` - the `Caretaker` with the provided ID does
    ///                            not exist;
    /// - `CARETAKER_NOT_ASSIGNED` - the `Caretaker` looks after no `Property`;
    /// - `CARETAKER_SUSPENDED` - the `Caretaker` is suspended;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Caretaker`'s `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            caretaker_id = %caretaker_id,
            due_at = ?due_at.as_ref().map(DateTime::to_rfc3339),
            gql.name = "createCaretakerDuty",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            priority = ?priority,
            title = %title,
        ),
    )]
    pub async fn create_caretaker_duty(
        caretaker_id: api::caretaker::Id,
        title: api::caretaker::DutyTitle,
        description: Option<api::caretaker::DutyText>,
        kind: api::caretaker::DutyKind,
        priority: api::caretaker::DutyPriority,
        due_at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateCaretakerDuty {
                caretaker_id: caretaker_id.into(),
                title: title.into(),
                description: description.map(Into::into),
                kind: kind.into(),
                priority: priority.into(),
                due_at: due_at.map(DateTime::coerce),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Starts the work on the `Duty` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUTY_NOT_EXISTS` - the `Duty` with the provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Duty` can't be started;
    /// - `PRIVILEGE_NOT_CARETAKER` - the current `User` is not the responsible
    ///                               `Caretaker`.
    #[tracing::instrument(
        skip_all,
        fields(
            duty_id = %duty_id,
            gql.name = "startCaretakerDuty",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn start_caretaker_duty(
        duty_id: api::caretaker::DutyId,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::StartCaretakerDuty {
                duty_id: duty_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes the `Duty` with the provided ID with the provided report.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUTY_NOT_EXISTS` - the `Duty` with the provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Duty` can't be completed;
    /// - `PRIVILEGE_NOT_CARETAKER` - the current `User` is not the responsible
    ///                               `Caretaker`.
    #[tracing::instrument(
        skip_all,
        fields(
            duty_id = %duty_id,
            gql.name = "submitCaretakerDutyReport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn submit_caretaker_duty_report(
        duty_id: api::caretaker::DutyId,
        report: api::caretaker::DutyText,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SubmitCaretakerDutyReport {
                duty_id: duty_id.into(),
                report: report.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reviews the completed `Duty` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUTY_NOT_EXISTS` - the `Duty` with the provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Duty` is not completed;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Duty`'s `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            duty_id = %duty_id,
            gql.name = "reviewCaretakerDuty",
            otel.name = Self::SPAN_NAME,
            rating = %rating,
        ),
    )]
    pub async fn review_caretaker_duty(
        duty_id: api::caretaker::DutyId,
        feedback: Option<api::caretaker::DutyText>,
        rating: Rating,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::ReviewCaretakerDuty {
                duty_id: duty_id.into(),
                feedback: feedback.map(Into::into),
                rating,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Duty` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUTY_NOT_EXISTS` - the `Duty` with the provided ID does not exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Duty` is completed or cancelled
    ///                                 already;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Duty`'s `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            duty_id = %duty_id,
            gql.name = "cancelCaretakerDuty",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_caretaker_duty(
        duty_id: api::caretaker::DutyId,
        ctx: &Context,
    ) -> Result<api::Duty, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CancelCaretakerDuty {
                duty_id: duty_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers the proprietor `User` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the provided ID does not exist;
    /// - `USER_ROLE_MISMATCH` - the `User` is not a proprietor;
    /// - `ALREADY_REGISTERED` - the `User` is registered already;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            business_name = ?business_name,
            gql.name = "registerProprietor",
            otel.name = Self::SPAN_NAME,
            registration_number = ?registration_number,
            user_id = %user_id,
        ),
    )]
    pub async fn register_proprietor(
        user_id: api::user::Id,
        business_name: Option<api::proprietor::BusinessName>,
        registration_number: Option<api::proprietor::RegistrationNumber>,
        ctx: &Context,
    ) -> Result<api::Proprietor, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RegisterProprietor {
                user_id: user_id.into(),
                business_name: business_name.map(Into::into),
                registration_number: registration_number.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the provided share of the `Property` with the provided ID to
    /// the `Proprietor` with the provided ID.
    ///
    /// The whole `Property` is assigned if no `percentage` is provided. The
    /// `Proprietor`'s existing share of the `Property` (if any) is replaced.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_NOT_EXISTS` - the `Proprietor` with the provided ID does
    ///                             not exist;
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does not
    ///                           exist;
    /// - `PROPERTY_OVEROWNED` - the share doesn't fit along with the other
    ///                          owners' ones;
    /// - `ZERO_SHARE` - provided `percentage` is zero;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "assignPropertyOwnership",
            otel.name = Self::SPAN_NAME,
            percentage = ?percentage.map(|p| p.to_string()),
            property_id = %property_id,
            proprietor_id = %proprietor_id,
        ),
    )]
    pub async fn assign_property_ownership(
        proprietor_id: api::proprietor::Id,
        property_id: api::property::Id,
        percentage: Option<Percent>,
        ctx: &Context,
    ) -> Result<api::Ownership, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::AssignPropertyOwnership {
                proprietor_id: proprietor_id.into(),
                property_id: property_id.into(),
                percentage,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Revokes the active `Ownership` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OWNERSHIP_NOT_EXISTS` - the `Ownership` with the provided ID does
    ///                            not exist;
    /// - `OWNERSHIP_REVOKED` - the `Ownership` is revoked already;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "revokePropertyOwnership",
            otel.name = Self::SPAN_NAME,
            ownership_id = %ownership_id,
        ),
    )]
    pub async fn revoke_property_ownership(
        ownership_id: api::proprietor::OwnershipId,
        ctx: &Context,
    ) -> Result<api::Ownership, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::RevokePropertyOwnership {
                ownership_id: ownership_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Posts a `JobUpdate` on the `MaintenanceRequest` with the provided ID
    /// assigned to the current `User`.
    ///
    /// The `MaintenanceRequest` itself stays unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_REQUEST_NOT_EXISTS` - the `MaintenanceRequest` with the
    ///                                      provided ID does not exist;
    /// - `TECHNICIAN_NOT_ASSIGNED` - the `MaintenanceRequest` is assigned to
    ///                               another `Technician`;
    /// - `PRIVILEGE_NOT_TECHNICIAN` - the current `User` is not a registered
    ///                                technician.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createJobUpdate",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            request_id = %request_id,
            status = ?status,
        ),
    )]
    pub async fn create_job_update(
        request_id: api::maintenance::Id,
        status: api::technician::JobStatus,
        notes: Option<api::technician::JobNotes>,
        kind: api::technician::JobUpdateKind,
        ctx: &Context,
    ) -> Result<api::technician::JobUpdate, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateJobUpdate {
                request_id: request_id.into(),
                status: status.into(),
                notes: notes.map(Into::into),
                kind: kind.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Drafts a `ProprietorReport` about the `Property` with the provided ID
    /// for the `Proprietor` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_NOT_EXISTS` - the `Proprietor` with the provided ID does
    ///                             not exist or is inactive;
    /// - `PROPRIETOR_NOT_OWNER` - the `Proprietor` owns no share of the
    ///                            `Property`;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createProprietorReport",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            proprietor_id = %proprietor_id,
            title = %title,
        ),
    )]
    pub async fn create_proprietor_report(
        proprietor_id: api::proprietor::Id,
        property_id: api::property::Id,
        kind: api::proprietor::ReportKind,
        title: api::proprietor::ReportTitle,
        description: Option<api::proprietor::ReportDescription>,
        ctx: &Context,
    ) -> Result<api::proprietor::Report, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateProprietorReport {
                proprietor_id: proprietor_id.into(),
                property_id: property_id.into(),
                kind: kind.into(),
                title: title.into(),
                description: description.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the unsent `ProprietorReport` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_REPORT_NOT_EXISTS` - the `ProprietorReport` with the
    ///                                    provided ID does not exist;
    /// - `PROPRIETOR_REPORT_SENT` - the `ProprietorReport` is sent already;
    /// - `INVALID_STATUS_TRANSITION` - the `SENT` status was requested, use
    ///                                 `sendProprietorReport` instead;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProprietorReport",
            otel.name = Self::SPAN_NAME,
            report_id = %report_id,
            status = ?status,
            title = ?title,
        ),
    )]
    pub async fn update_proprietor_report(
        report_id: api::proprietor::ReportId,
        title: Option<api::proprietor::ReportTitle>,
        description: Nullable<api::proprietor::ReportDescription>,
        status: Option<api::proprietor::ReportStatus>,
        ctx: &Context,
    ) -> Result<api::proprietor::Report, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateProprietorReport {
                report_id: report_id.into(),
                title: title.map(Into::into),
                description: description
                    .explicit()
                    .map(|d| d.map(Into::into)),
                status: status.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves and sends the `ProprietorReport` with the provided ID to its
    /// `Proprietor`.
    ///
    /// A sent `ProprietorReport` cannot be changed anymore.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_REPORT_NOT_EXISTS` - the `ProprietorReport` with the
    ///                                    provided ID does not exist;
    /// - `PROPRIETOR_REPORT_SENT` - the `ProprietorReport` is sent already;
    /// - `PRIVILEGE_NOT_MANAGER` - the current `User` doesn't manage the
    ///                             `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendProprietorReport",
            otel.name = Self::SPAN_NAME,
            report_id = %report_id,
        ),
    )]
    pub async fn send_proprietor_report(
        report_id: api::proprietor::ReportId,
        ctx: &Context,
    ) -> Result<api::proprietor::Report, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SendProprietorReport {
                report_id: report_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends a `ProprietorMessage` to the `Proprietor` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_NOT_EXISTS` - the `Proprietor` with the provided ID does
    ///                             not exist or is inactive;
    /// - `PRIVILEGE_NOT_SUPER_ADMIN` - the current `User` is not a
    ///                                 super-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendProprietorMessage",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            proprietor_id = %proprietor_id,
            subject = ?subject,
        ),
    )]
    pub async fn send_proprietor_message(
        proprietor_id: api::proprietor::Id,
        subject: Option<api::proprietor::MessageSubject>,
        body: api::proprietor::MessageBody,
        kind: api::proprietor::MessageKind,
        ctx: &Context,
    ) -> Result<api::proprietor::Message, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SendProprietorMessage {
                proprietor_id: proprietor_id.into(),
                subject: subject.map(Into::into),
                body: body.into(),
                kind: kind.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `ProprietorMessage` with the provided ID as read by the
    /// current `User`.
    ///
    /// Marking an already read `ProprietorMessage` keeps its `readAt`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPRIETOR_MESSAGE_NOT_EXISTS` - the `ProprietorMessage` with the
    ///                                     provided ID does not exist;
    /// - `PRIVILEGE_NOT_RECIPIENT` - the `ProprietorMessage` was sent to
    ///                               another `Proprietor`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markProprietorMessageRead",
            message_id = %message_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_proprietor_message_read(
        message_id: api::proprietor::MessageId,
        ctx: &Context,
    ) -> Result<api::proprietor::Message, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::MarkProprietorMessageRead {
                message_id: message_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum CommonError {
        #[code = "ALREADY_REGISTERED"]
        #[status = CONFLICT]
        #[message = "`User` with the provided ID is registered already"]
        AlreadyRegistered,

        #[code = "CURRENCY_MISMATCH"]
        #[status = BAD_REQUEST]
        #[message = "Provided amount is in another currency"]
        CurrencyMismatch,

        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Provided `UserEmail` is occupied by another `User`"]
        EmailOccupied,

        #[code = "INVALID_STATUS_TRANSITION"]
        #[status = CONFLICT]
        #[message = "Status can't be changed to the requested one"]
        InvalidStatusTransition,

        #[code = "LEASE_NOT_ACTIVE"]
        #[status = CONFLICT]
        #[message = "`Lease` with the provided ID is not active"]
        LeaseNotActive,

        #[code = "NON_POSITIVE_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "Provided amount must be positive"]
        NonPositiveAmount,

        #[code = "USER_ROLE_MISMATCH"]
        #[status = CONFLICT]
        #[message = "`User` with the provided ID has another `UserRole`"]
        UserRoleMismatch,
    }
}

impl AsError for domain::maintenance::StatusError {
    fn try_as_error(&self) -> Option<Error> {
        Some(CommonError::InvalidStatusTransition.into())
    }
}

impl AsError for domain::caretaker::duty::StatusError {
    fn try_as_error(&self) -> Option<Error> {
        Some(CommonError::InvalidStatusTransition.into())
    }
}

impl AsError for command::register_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROLE_FORBIDDEN"]
                #[status = FORBIDDEN]
                #[message = "Provided `UserRole` can't be self-registered"]
                RoleForbidden,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(CommonError::EmailOccupied.into()),
            Self::PasswordHashing(_) => None,
            Self::RoleForbidden(_) => Some(Error::RoleForbidden.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,

                #[code = "USER_NOT_ACTIVE"]
                #[status = FORBIDDEN]
                #[message = "`User` is not approved yet or is suspended"]
                UserNotActive,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotActive(_) => Some(Error::UserNotActive.into()),
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::update_user_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(CommonError::EmailOccupied.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::update_user_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_PASSWORD"]
                #[status = CONFLICT]
                #[message = "Provided `old_password` does not match the \
                             current `User` password"]
                WrongPassword,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PasswordHashing(_) | Self::UserNotExists(_) => None,
            Self::WrongPassword => Some(Error::WrongPassword.into()),
        }
    }
}

impl AsError for command::update_user_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USER_SELF_UPDATE"]
                #[status = CONFLICT]
                #[message = "`User` can't change their own status"]
                SelfUpdate,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SelfUpdate(_) => Error::SelfUpdate.into(),
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::update_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::assign_property_manager::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MANAGER_ALREADY_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`User` manages the `Property` already"]
                AlreadyAssigned,

                #[code = "USER_NOT_PROPERTY_MANAGER"]
                #[status = CONFLICT]
                #[message = "`User` with the provided ID is not an active \
                             property manager"]
                UserNotPropertyManager,
            }
        }

        Some(match self {
            Self::AlreadyAssigned(_) => Error::AlreadyAssigned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserNotPropertyManager(_) => {
                Error::UserNotPropertyManager.into()
            }
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::unassign_property_manager::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MANAGER_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Property` has no active manager"]
                NotAssigned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAssigned(_) => Error::NotAssigned.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::create_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "UNIT_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Property` has a `Unit` with the provided number \
                             already"]
                NumberOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositiveRent(_) => CommonError::NonPositiveAmount.into(),
            Self::NumberOccupied(_) => Error::NumberOccupied.into(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::update_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "UNIT_STATUS_MANAGED_BY_LEASE"]
                #[status = CONFLICT]
                #[message = "`Unit` is occupied and released by `Lease`s only"]
                StatusManagedByLease,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositiveRent(_) => CommonError::NonPositiveAmount.into(),
            Self::StatusManagedByLease(_) => Error::StatusManagedByLease.into(),
            Self::UnitNotExists(_) => api::query::UnitError::NotExists.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::create_lease::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_LEASE_TERM"]
                #[status = BAD_REQUEST]
                #[message = "`Lease` must end after it starts"]
                InvalidTerm,

                #[code = "TENANT_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`User` with the provided ID leases a `Unit` \
                             already"]
                TenantOccupied,

                #[code = "UNIT_NOT_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Unit` with the provided ID is not available"]
                UnitNotAvailable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidTerm => Error::InvalidTerm.into(),
            Self::TenantOccupied(_) => Error::TenantOccupied.into(),
            Self::UnitNotAvailable(_) => Error::UnitNotAvailable.into(),
            Self::UnitNotExists(_) => api::query::UnitError::NotExists.into(),
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
            Self::UserNotTenant(_) => CommonError::UserRoleMismatch.into(),
        })
    }
}

impl AsError for command::terminate_lease::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::LeaseNotActive(_) => CommonError::LeaseNotActive.into(),
            Self::LeaseNotExists(_) => api::query::LeaseError::NotExists.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::create_rent_charge::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::LeaseNotActive(_) => CommonError::LeaseNotActive.into(),
            Self::LeaseNotExists(_) => api::query::LeaseError::NotExists.into(),
            Self::NonPositiveAmount(_) => CommonError::NonPositiveAmount.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

define_error! {
    enum PaymentError {
        #[code = "PAYMENT_SETTLED"]
        #[status = CONFLICT]
        #[message = "`Payment` is paid or waived already"]
        Settled,
    }
}

impl AsError for domain::payment::RecordError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::AlreadySettled => PaymentError::Settled.into(),
            Self::CurrencyMismatch => CommonError::CurrencyMismatch.into(),
            Self::NonPositiveAmount => CommonError::NonPositiveAmount.into(),
        })
    }
}

impl AsError for command::record_rent_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Invalid(e) => return e.try_as_error(),
            Self::PaymentNotExists(_) => {
                api::query::PaymentError::NotExists.into()
            }
            Self::UserNotAllowed(_) => api::PrivilegeError::NotAllowed.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::waive_rent_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PaymentNotExists(_) => {
                api::query::PaymentError::NotExists.into()
            }
            Self::PaymentSettled(_) => PaymentError::Settled.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::collect_security_deposit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::LeaseNotActive(_) => CommonError::LeaseNotActive.into(),
            Self::LeaseNotExists(_) => api::query::LeaseError::NotExists.into(),
            Self::NonPositiveAmount(_) => CommonError::NonPositiveAmount.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for domain::deposit::ReleaseError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DEPOSIT_NOT_HELD"]
                #[status = CONFLICT]
                #[message = "`Deposit` is released already"]
                NotHeld,

                #[code = "INVALID_REFUND"]
                #[status = BAD_REQUEST]
                #[message = "Refund must be non-negative and not exceed the \
                             `Deposit`"]
                InvalidRefund,
            }
        }

        Some(match self {
            Self::CurrencyMismatch => CommonError::CurrencyMismatch.into(),
            Self::NegativeRefund | Self::RefundExceedsAmount => {
                Error::InvalidRefund.into()
            }
            Self::NotHeld => Error::NotHeld.into(),
        })
    }
}

impl AsError for command::release_security_deposit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DepositNotExists(_) => {
                api::query::DepositError::NotExists.into()
            }
            Self::Invalid(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::create_maintenance_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CategoryNotExists(_) => {
                api::query::TechnicianError::CategoryNotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::Status(e) => return e.try_as_error(),
            Self::UnitNotExists(_) => api::query::UnitError::NotExists.into(),
            Self::UserNotAllowed(_) => api::PrivilegeError::NotAllowed.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::assign_maintenance_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TECHNICIAN_NOT_SERVING"]
                #[status = CONFLICT]
                #[message = "`Technician` with the provided ID doesn't serve \
                             the `Property`"]
                TechnicianNotServing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::Status(e) => return e.try_as_error(),
            Self::TechnicianNotServing(_) => Error::TechnicianNotServing.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::auto_assign_maintenance_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MAINTENANCE_REQUEST_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`MaintenanceRequest` is assigned already"]
                AlreadyAssigned,

                #[code = "NO_TECHNICIAN_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "No available `Technician` serves the `Property`"]
                NoTechnicianAvailable,
            }
        }

        Some(match self {
            Self::AlreadyAssigned(_) => Error::AlreadyAssigned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::NoTechnicianAvailable(_) => {
                Error::NoTechnicianAvailable.into()
            }
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::update_maintenance_request_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotAllowed(_) => api::PrivilegeError::NotAllowed.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::escalate_maintenance_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotAllowed(_) => api::PrivilegeError::NotAllowed.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::rate_maintenance_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MAINTENANCE_REQUEST_RATED"]
                #[status = CONFLICT]
                #[message = "`MaintenanceRequest` is rated already"]
                AlreadyRated,

                #[code = "MAINTENANCE_REQUEST_NOT_COMPLETED"]
                #[status = CONFLICT]
                #[message = "`MaintenanceRequest` is not completed yet"]
                NotCompleted,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Rate(domain::maintenance::RateError::AlreadyRated) => {
                Error::AlreadyRated.into()
            }
            Self::Rate(domain::maintenance::RateError::NotCompleted) => {
                Error::NotCompleted.into()
            }
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotReporter(_) => api::PrivilegeError::Reporter.into(),
        })
    }
}

define_error! {
    enum CategoryError {
        #[code = "TECHNICIAN_CATEGORY_NAME_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Provided name is occupied by another \
                     `TechnicianCategory`"]
        NameOccupied,
    }
}

impl AsError for command::create_technician_category::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NameOccupied(_) => CategoryError::NameOccupied.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::update_technician_category::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CategoryNotExists(_) => {
                api::query::TechnicianError::CategoryNotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::NameOccupied(_) => CategoryError::NameOccupied.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::register_technician::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::AlreadyRegistered(_) => CommonError::AlreadyRegistered.into(),
            Self::CategoryNotExists(_) => {
                api::query::TechnicianError::CategoryNotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
            Self::UserNotTechnician(_) => CommonError::UserRoleMismatch.into(),
        })
    }
}

impl AsError for command::update_technician_availability::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotTechnician(_) => api::PrivilegeError::Technician.into(),
        })
    }
}

impl AsError for command::assign_technician_to_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TECHNICIAN_ALREADY_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Technician` serves the `Property` already"]
                AlreadyAssigned,
            }
        }

        Some(match self {
            Self::AlreadyAssigned(_) => Error::AlreadyAssigned.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::TechnicianNotExists(_) => {
                api::query::TechnicianError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::unassign_technician_from_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TECHNICIAN_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Technician` doesn't serve the `Property`"]
                NotAssigned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAssigned(_) => Error::NotAssigned.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

define_error! {
    enum CaretakerError {
        #[code = "CARETAKER_SUSPENDED"]
        #[status = CONFLICT]
        #[message = "`Caretaker` with the provided ID is suspended"]
        Suspended,
    }
}

impl AsError for command::register_caretaker::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::AlreadyRegistered(_) => CommonError::AlreadyRegistered.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotAllowed(_) => api::PrivilegeError::NotAllowed.into(),
            Self::UserNotCaretaker(_) | Self::UserNotPropertyManager(_) => {
                CommonError::UserRoleMismatch.into()
            }
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
        })
    }
}

impl AsError for command::assign_caretaker::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CARETAKER_ALREADY_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Caretaker` looks after the `Property` already"]
                AlreadyAssigned,
            }
        }

        Some(match self {
            Self::AlreadyAssigned(_) => Error::AlreadyAssigned.into(),
            Self::CaretakerNotExists(_) => {
                api::query::CaretakerError::NotExists.into()
            }
            Self::CaretakerSuspended(_) => CaretakerError::Suspended.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::unassign_caretaker::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CARETAKER_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Property` has no `Caretaker`"]
                NotAssigned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAssigned(_) => Error::NotAssigned.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::update_caretaker::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CaretakerNotExists(_) => {
                api::query::CaretakerError::NotExists.into()
            }
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSupervisor(_) => api::PrivilegeError::Supervisor.into(),
        })
    }
}

impl AsError for command::create_caretaker_duty::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CARETAKER_NOT_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "`Caretaker` looks after no `Property`"]
                CaretakerNotAssigned,
            }
        }

        Some(match self {
            Self::CaretakerNotAssigned(_) => Error::CaretakerNotAssigned.into(),
            Self::CaretakerNotExists(_) => {
                api::query::CaretakerError::NotExists.into()
            }
            Self::CaretakerSuspended(_) => CaretakerError::Suspended.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::start_caretaker_duty::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DutyNotExists(_) => api::query::DutyError::NotExists.into(),
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotCaretaker(_) => api::PrivilegeError::Caretaker.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::submit_caretaker_duty_report::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DutyNotExists(_) => api::query::DutyError::NotExists.into(),
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotCaretaker(_) => api::PrivilegeError::Caretaker.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::review_caretaker_duty::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DutyNotExists(_) => api::query::DutyError::NotExists.into(),
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::cancel_caretaker_duty::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DutyNotExists(_) => api::query::DutyError::NotExists.into(),
            Self::Status(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::register_proprietor::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::AlreadyRegistered(_) => CommonError::AlreadyRegistered.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotExists(_) => api::query::UserError::NotExists.into(),
            Self::UserNotProprietor(_) => CommonError::UserRoleMismatch.into(),
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::assign_property_ownership::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PROPERTY_OVEROWNED"]
                #[status = CONFLICT]
                #[message = "Owned shares of the `Property` would exceed 100%"]
                Overowned,

                #[code = "ZERO_SHARE"]
                #[status = BAD_REQUEST]
                #[message = "`Ownership` share must be positive"]
                ZeroShare,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Overowned(_) => Error::Overowned.into(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
            Self::ProprietorNotExists(_) => {
                api::query::ProprietorError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
            Self::ZeroShare => Error::ZeroShare.into(),
        })
    }
}

impl AsError for command::revoke_property_ownership::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OWNERSHIP_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Ownership` with the provided ID does not exist"]
                NotExists,

                #[code = "OWNERSHIP_REVOKED"]
                #[status = CONFLICT]
                #[message = "`Ownership` is revoked already"]
                Revoked,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::OwnershipNotExists(_) => Error::NotExists.into(),
            Self::OwnershipRevoked(_) => Error::Revoked.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::create_job_update::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TECHNICIAN_NOT_ASSIGNED"]
                #[status = FORBIDDEN]
                #[message = "`MaintenanceRequest` is assigned to another \
                             `Technician`"]
                NotAssigned,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RequestNotExists(_) => {
                api::query::MaintenanceRequestError::NotExists.into()
            }
            Self::TechnicianNotAssigned(_) => Error::NotAssigned.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotTechnician(_) => api::PrivilegeError::Technician.into(),
        })
    }
}

define_error! {
    enum ReportError {
        #[code = "PROPRIETOR_REPORT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`ProprietorReport` with the provided ID does not exist"]
        NotExists,

        #[code = "PROPRIETOR_REPORT_SENT"]
        #[status = CONFLICT]
        #[message = "`ProprietorReport` is sent already"]
        Sent,
    }
}

impl AsError for domain::proprietor::report::ChangeError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::AlreadySent => ReportError::Sent.into(),
            Self::SentStatus => CommonError::InvalidStatusTransition.into(),
        })
    }
}

impl AsError for command::create_proprietor_report::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PROPRIETOR_NOT_OWNER"]
                #[status = CONFLICT]
                #[message = "`Proprietor` owns no share of the `Property`"]
                NotOwner,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProprietorNotExists(_) => {
                api::query::ProprietorError::NotExists.into()
            }
            Self::ProprietorNotOwner(_) => Error::NotOwner.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::update_proprietor_report::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Change(e) => return e.try_as_error(),
            Self::Db(e) => return e.try_as_error(),
            Self::ReportNotExists(_) => ReportError::NotExists.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::send_proprietor_report::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Change(e) => return e.try_as_error(),
            Self::Db(e) => return e.try_as_error(),
            Self::ReportNotExists(_) => ReportError::NotExists.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotManager(_) => api::PrivilegeError::Manager.into(),
        })
    }
}

impl AsError for command::send_proprietor_message::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProprietorNotExists(_) => {
                api::query::ProprietorError::NotExists.into()
            }
            Self::UserNotExists(_) => return None,
            Self::UserNotSuperAdmin(_) => api::PrivilegeError::SuperAdmin.into(),
        })
    }
}

impl AsError for command::mark_proprietor_message_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PROPRIETOR_MESSAGE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`ProprietorMessage` with the provided ID does \
                             not exist"]
                NotExists,

                #[code = "PRIVILEGE_NOT_RECIPIENT"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` must be the recipient of \
                             the `ProprietorMessage`"]
                NotRecipient,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::MessageNotExists(_) => Error::NotExists.into(),
            Self::UserNotExists(_) => return None,
            Self::UserNotRecipient(_) => Error::NotRecipient.into(),
        })
    }
}
