//! [`Query`] collection related to [`Technician`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{
        maintenance, property,
        technician::{self, category, job, Category},
        user, Technician,
    },
    read,
};

use super::DatabaseQuery;

/// Queries a [`Technician`] by its [`technician::Id`].
pub type ById = DatabaseQuery<By<Option<Technician>, technician::Id>>;

/// Queries a [`Technician`] by the ID of its [`User`].
///
/// [`User`]: crate::domain::User
pub type ByUserId = DatabaseQuery<By<Option<Technician>, user::Id>>;

/// Queries [`Technician`]s actively assigned to a [`Property`].
///
/// [`Property`]: crate::domain::Property
pub type OfProperty = DatabaseQuery<By<Vec<Technician>, property::Id>>;

/// Queries a [`Category`] by its [`category::Id`].
pub type CategoryById = DatabaseQuery<By<Option<Category>, category::Id>>;

/// Queries active [`Category`]s ordered by name.
pub type ActiveCategories =
    DatabaseQuery<By<Vec<Category>, read::technician::ActiveCategories>>;

/// Queries the job [`job::Update`]s posted on a maintenance request, newest
/// first.
pub type JobHistory = DatabaseQuery<By<Vec<job::Update>, maintenance::Id>>;
