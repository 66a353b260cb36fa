//! Technician [`Assignment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, technician};
#[cfg(doc)]
use crate::domain::{Property, Technician};

/// Link allowing a [`Technician`] to serve a [`Property`].
#[derive(Clone, Debug)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: Id,

    /// ID of the assigned [`Technician`].
    pub technician_id: technician::Id,

    /// ID of the served [`Property`].
    pub property_id: property::Id,

    /// Indicator whether this [`Assignment`] is in force.
    pub is_active: bool,

    /// [`DateTime`] when this [`Assignment`] was (re)activated.
    pub assigned_at: AssignmentDateTime,
}

/// ID of an [`Assignment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when an [`Assignment`] was made.
pub type AssignmentDateTime = DateTimeOf<(Assignment, unit::Assignment)>;
