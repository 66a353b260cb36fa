//! [`Query`] collection related to [`Caretaker`]s and their [`Duty`]s.

use common::operations::By;

use crate::domain::{
    caretaker::{self, duty, Duty},
    property, user, Caretaker,
};
#[cfg(doc)]
use crate::{
    domain::{Property, User},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Caretaker`] by its [`caretaker::Id`].
pub type ById = DatabaseQuery<By<Option<Caretaker>, caretaker::Id>>;

/// Queries a [`Caretaker`] by the ID of its [`User`].
pub type ByUserId = DatabaseQuery<By<Option<Caretaker>, user::Id>>;

/// Queries the [`Caretaker`] of a [`Property`].
pub type OfProperty = DatabaseQuery<By<Option<Caretaker>, property::Id>>;

/// Queries [`Caretaker`]s supervised by a property manager [`User`].
pub type OfManager = DatabaseQuery<By<Vec<Caretaker>, user::Id>>;

/// Queries a [`Duty`] by its [`duty::Id`].
pub type DutyById = DatabaseQuery<By<Option<Duty>, duty::Id>>;

/// Queries [`Duty`]s of a [`Caretaker`], newest first.
pub type DutiesOfCaretaker = DatabaseQuery<By<Vec<Duty>, caretaker::Id>>;

/// Queries [`Duty`]s of a [`Property`], newest first.
pub type DutiesOfProperty = DatabaseQuery<By<Vec<Duty>, property::Id>>;
