//! [`Query`] collection related to [`MaintenanceRequest`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{maintenance, MaintenanceRequest},
    read,
};

use super::DatabaseQuery;

/// Queries a [`MaintenanceRequest`] by its [`maintenance::Id`].
pub type ById = DatabaseQuery<By<Option<MaintenanceRequest>, maintenance::Id>>;

/// Queries [`MaintenanceRequest`]s reported by a [`User`].
///
/// [`User`]: crate::domain::User
pub type ReportedBy =
    DatabaseQuery<By<Vec<MaintenanceRequest>, read::maintenance::ReportedBy>>;

/// Queries [`MaintenanceRequest`]s of a [`Property`].
///
/// [`Property`]: crate::domain::Property
pub type OfProperty =
    DatabaseQuery<By<Vec<MaintenanceRequest>, read::maintenance::OfProperty>>;

/// Queries jobs of a [`Technician`].
///
/// [`Technician`]: crate::domain::Technician
pub type AssignedTo =
    DatabaseQuery<By<Vec<MaintenanceRequest>, read::maintenance::AssignedTo>>;

/// Queries [`MaintenanceRequest`]s of a [`Property`] waiting for its
/// manager.
///
/// [`Property`]: crate::domain::Property
pub type EscalationView = DatabaseQuery<
    By<Vec<MaintenanceRequest>, read::maintenance::EscalationView>,
>;
