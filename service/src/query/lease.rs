//! [`Query`] collection related to [`Tenant`]s and their [`Lease`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{lease, property, tenant, unit, user, Lease, Tenant},
    read::Active,
};

use super::DatabaseQuery;

/// Queries a [`Tenant`] by its [`tenant::Id`].
pub type TenantById = DatabaseQuery<By<Option<Tenant>, tenant::Id>>;

/// Queries a [`Tenant`] by the ID of its [`User`].
///
/// [`User`]: crate::domain::User
pub type TenantByUserId = DatabaseQuery<By<Option<Tenant>, user::Id>>;

/// Queries a [`Lease`] by its [`lease::Id`].
pub type ById = DatabaseQuery<By<Option<Lease>, lease::Id>>;

/// Queries the active [`Lease`] of a [`Unit`].
///
/// [`Unit`]: crate::domain::Unit
pub type ActiveOfUnit = DatabaseQuery<By<Option<Active<Lease>>, unit::Id>>;

/// Queries [`Lease`]s of a [`Property`].
///
/// [`Property`]: crate::domain::Property
pub type OfProperty = DatabaseQuery<By<Vec<Lease>, property::Id>>;

/// Queries [`Lease`]s of a [`Tenant`], newest first.
pub type OfTenant = DatabaseQuery<By<Vec<Lease>, tenant::Id>>;
