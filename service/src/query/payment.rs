//! [`Query`] collection related to [`Payment`]s and [`Deposit`]s.

use common::operations::By;

use crate::domain::{deposit, payment, property, tenant, Deposit, Payment};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a [`Payment`] by its [`payment::Id`].
pub type ById = DatabaseQuery<By<Option<Payment>, payment::Id>>;

/// Queries [`Payment`]s of a [`Tenant`], latest due first.
///
/// [`Tenant`]: crate::domain::Tenant
pub type OfTenant = DatabaseQuery<By<Vec<Payment>, tenant::Id>>;

/// Queries [`Payment`]s of a [`Property`], latest due first.
pub type OfProperty = DatabaseQuery<By<Vec<Payment>, property::Id>>;

/// Queries a [`Deposit`] by its [`deposit::Id`].
pub type DepositById = DatabaseQuery<By<Option<Deposit>, deposit::Id>>;

/// Queries [`Deposit`]s of a [`Property`], newest first.
pub type DepositsOfProperty = DatabaseQuery<By<Vec<Deposit>, property::Id>>;
