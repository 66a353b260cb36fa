//! [`Caretaker`] definitions.

pub mod duty;

use common::{define_kind, unit, DateTime, DateTimeOf, Rating};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, User};

pub use self::duty::Duty;

/// [`User`] looking after a single [`Property`] on site.
#[derive(Clone, Debug)]
pub struct Caretaker {
    /// ID of this [`Caretaker`].
    pub id: Id,

    /// ID of the [`User`] this [`Caretaker`] profile belongs to.
    pub user_id: user::Id,

    /// ID of the [`Property`] this [`Caretaker`] looks after, if any.
    pub property_id: Option<property::Id>,

    /// ID of the property manager [`User`] supervising this [`Caretaker`],
    /// if any.
    pub manager_id: Option<user::Id>,

    /// [`Status`] of this [`Caretaker`].
    pub status: Status,

    /// Performance [`Rating`] given by the manager, if any.
    pub performance_rating: Option<Rating>,

    /// [`DateTime`] when this [`Caretaker`] was hired.
    pub hired_at: HiringDateTime,

    /// [`DateTime`] when this [`Caretaker`] was assigned to the current
    /// [`Property`].
    pub assigned_at: Option<AssignmentDateTime>,
}

impl Caretaker {
    /// Assigns this [`Caretaker`] to the provided [`Property`], replacing the
    /// previous one, if any.
    pub fn assign(&mut self, property_id: property::Id, now: DateTime) {
        self.property_id = Some(property_id);
        self.assigned_at = Some(now.coerce());
    }

    /// Frees this [`Caretaker`] from its [`Property`].
    pub fn unassign(&mut self) {
        self.property_id = None;
        self.assigned_at = None;
    }

    /// Indicates whether this [`Caretaker`] is allowed to work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// ID of a [`Caretaker`].
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
    #[doc = "Status of a [`Caretaker`]."]
    enum Status {
        #[doc = "Working."]
        Active = 1,

        #[doc = "Forbidden to work."]
        Suspended = 2,
    }
}

/// [`DateTime`] when a [`Caretaker`] was hired.
pub type HiringDateTime = DateTimeOf<(Caretaker, unit::Creation)>;

/// [`DateTime`] when a [`Caretaker`] was assigned to a [`Property`].
pub type AssignmentDateTime = DateTimeOf<(Caretaker, unit::Assignment)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{property, user};

    use super::{Caretaker, Id, Status};

    fn caretaker() -> Caretaker {
        Caretaker {
            id: Id::new(),
            user_id: user::Id::new(),
            property_id: None,
            manager_id: None,
            status: Status::Active,
            performance_rating: None,
            hired_at: DateTime::now().coerce(),
            assigned_at: None,
        }
    }

    #[test]
    fn assignment_replaces_property() {
        let mut c = caretaker();
        let (first, second) = (property::Id::new(), property::Id::new());

        c.assign(first, DateTime::now());
        assert_eq!(c.property_id, Some(first));
        assert!(c.assigned_at.is_some());

        c.assign(second, DateTime::now());
        assert_eq!(c.property_id, Some(second));

        c.unassign();
        assert_eq!(c.property_id, None);
        assert!(c.assigned_at.is_none());
    }

    #[test]
    fn suspended_caretaker_is_inactive() {
        let mut c = caretaker();
        assert!(c.is_active());

        c.status = Status::Suspended;
        assert!(!c.is_active());
    }
}
