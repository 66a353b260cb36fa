//! [`Proprietor`] read model definitions.

use derive_more::{From, Into};

use crate::domain::{property, proprietor};
#[cfg(doc)]
use crate::domain::{
    proprietor::{Message, Report},
    Property, Proprietor,
};

/// Selector of the [`Report`]s addressed to a [`Proprietor`], newest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reports {
    /// ID of the [`Proprietor`] to select [`Report`]s of.
    pub proprietor_id: proprietor::Id,

    /// ID of the [`Property`] to filter [`Report`]s by, if any.
    pub property_id: Option<property::Id>,
}

/// Selector of the [`Message`]s received by a [`Proprietor`], newest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Messages {
    /// ID of the [`Proprietor`] to select [`Message`]s of.
    pub proprietor_id: proprietor::Id,

    /// Indicator whether only unread [`Message`]s should be selected.
    pub unread_only: bool,
}

/// Number of unread [`Message`]s of a [`Proprietor`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct UnreadMessagesCount(i32);
