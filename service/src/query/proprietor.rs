//! [`Query`] collection related to [`Proprietor`]s, their [`Ownership`]s,
//! [`Report`]s and [`Message`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{
        property,
        proprietor::{self, message, ownership, report, Message, Ownership, Report},
        user, Proprietor,
    },
    read::{self, Active},
};

use super::DatabaseQuery;

/// Queries a [`Proprietor`] by its [`proprietor::Id`].
pub type ById = DatabaseQuery<By<Option<Proprietor>, proprietor::Id>>;

/// Queries a [`Proprietor`] by the ID of its [`User`].
///
/// [`User`]: crate::domain::User
pub type ByUserId = DatabaseQuery<By<Option<Proprietor>, user::Id>>;

/// Queries an [`Ownership`] by its [`ownership::Id`].
pub type OwnershipById = DatabaseQuery<By<Option<Ownership>, ownership::Id>>;

/// Queries active [`Ownership`]s of a [`Proprietor`].
pub type Ownerships =
    DatabaseQuery<By<Vec<Active<Ownership>>, proprietor::Id>>;

/// Queries active [`Ownership`]s of a [`Property`].
///
/// [`Property`]: crate::domain::Property
pub type Owners = DatabaseQuery<By<Vec<Active<Ownership>>, property::Id>>;

/// Queries a [`Report`] by its [`report::Id`].
pub type ReportById = DatabaseQuery<By<Option<Report>, report::Id>>;

/// Queries [`Report`]s addressed to a [`Proprietor`].
pub type Reports = DatabaseQuery<By<Vec<Report>, read::proprietor::Reports>>;

/// Queries a [`Message`] by its [`message::Id`].
pub type MessageById = DatabaseQuery<By<Option<Message>, message::Id>>;

/// Queries [`Message`]s received by a [`Proprietor`].
pub type Messages =
    DatabaseQuery<By<Vec<Message>, read::proprietor::Messages>>;

/// Queries the number of unread [`Message`]s of a [`Proprietor`].
pub type UnreadMessagesCount = DatabaseQuery<
    By<read::proprietor::UnreadMessagesCount, proprietor::Id>,
>;
