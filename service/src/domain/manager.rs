//! Property manager [`Assignment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Link making a property manager [`User`] responsible for a [`Property`].
#[derive(Clone, Debug)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: Id,

    /// ID of the managing [`User`].
    pub manager_id: user::Id,

    /// ID of the managed [`Property`].
    pub property_id: property::Id,

    /// [`Status`] of this [`Assignment`].
    pub status: Status,

    /// [`DateTime`] when this [`Assignment`] was made.
    pub assigned_at: AssignmentDateTime,
}

impl Assignment {
    /// Indicates whether this [`Assignment`] is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
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

define_kind! {
    #[doc = "Status of an [`Assignment`]."]
    enum Status {
        #[doc = "Manager is responsible for the property."]
        Active = 1,

        #[doc = "Manager was unassigned from the property."]
        Inactive = 2,

        #[doc = "Property was handed over to another manager."]
        Transferred = 3,
    }
}

/// [`DateTime`] when an [`Assignment`] was made.
pub type AssignmentDateTime = DateTimeOf<(Assignment, unit::Assignment)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{property, user};

    use super::{Assignment, Id, Status};

    #[test]
    fn only_active_assignment_is_in_force() {
        let mut a = Assignment {
            id: Id::new(),
            manager_id: user::Id::new(),
            property_id: property::Id::new(),
            status: Status::Active,
            assigned_at: DateTime::now().coerce(),
        };
        assert!(a.is_active());

        for status in [Status::Inactive, Status::Transferred] {
            a.status = status;
            assert!(!a.is_active(), "`{status}` assignment is in force");
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(Status::Transferred.to_string(), "TRANSFERRED");
        assert_eq!("INACTIVE".parse::<Status>().unwrap(), Status::Inactive);
    }
}
