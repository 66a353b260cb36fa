//! Maintenance [`Request`] read model definitions.

use crate::domain::{maintenance, property, technician, user};
#[cfg(doc)]
use crate::domain::{maintenance::Request, Property, Technician, User};

/// Selector of the open [`Request`]s of a [`Property`] needing a manager's
/// attention: the unassigned and the escalated ones.
///
/// Ordered by escalation (or creation, if not escalated) time ascending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EscalationView {
    /// ID of the [`Property`] to select [`Request`]s of.
    pub property_id: property::Id,
}

/// Selector of the [`Request`]s reported by a [`User`], newest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportedBy(pub user::Id);

/// Selector of the [`Request`]s of a [`Property`], newest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OfProperty {
    /// ID of the [`Property`] to select [`Request`]s of.
    pub property_id: property::Id,

    /// [`maintenance::Status`] to filter [`Request`]s by, if any.
    pub status: Option<maintenance::Status>,
}

/// Selector of the [`Request`]s assigned to a [`Technician`], newest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AssignedTo {
    /// ID of the [`Technician`] to select [`Request`]s of.
    pub technician_id: technician::Id,

    /// [`maintenance::Status`] to filter [`Request`]s by, if any.
    pub status: Option<maintenance::Status>,
}
