//! [`Query`] collection related to [`Property`]s and their [`Unit`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{manager, property, unit, user, Property, Unit},
    read::{self, Active},
};

use super::DatabaseQuery;

/// Queries a [`Property`] by its [`property::Id`].
pub type ById = DatabaseQuery<By<Option<Property>, property::Id>>;

/// Queries multiple [`Property`]s by their [`property::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<property::Id, Property>, Vec<property::Id>>>;

/// Queries a list of [`Property`]s.
pub type List = DatabaseQuery<
    By<read::property::list::Page, read::property::list::Selector>,
>;

/// Queries total count of [`Property`] list items.
pub type TotalCount = DatabaseQuery<By<read::property::list::TotalCount, ()>>;

/// Queries a [`Unit`] by its [`unit::Id`].
pub type UnitById = DatabaseQuery<By<Option<Unit>, unit::Id>>;

/// Queries [`Unit`]s of a [`Property`].
pub type Units = DatabaseQuery<By<Vec<Unit>, property::Id>>;

/// Queries the active [`manager::Assignment`] of a [`Property`].
pub type Manager =
    DatabaseQuery<By<Option<Active<manager::Assignment>>, property::Id>>;

/// Queries active [`manager::Assignment`]s of a property manager.
pub type ManagedBy =
    DatabaseQuery<By<Vec<manager::Assignment>, user::Id>>;
