//! [`Technician`] read model definitions.

#[cfg(doc)]
use crate::domain::{technician::Category, Technician};

/// Selector of the active [`Category`]s, ordered by name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ActiveCategories;
