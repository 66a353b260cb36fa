//! [`Tenant`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, unit as rental, user};
#[cfg(doc)]
use crate::domain::{Property, Unit, User};

/// [`User`] living in a [`Unit`] of a [`Property`].
#[derive(Clone, Debug)]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: Id,

    /// ID of the [`User`] this [`Tenant`] record belongs to.
    pub user_id: user::Id,

    /// ID of the [`Property`] this [`Tenant`] lives in.
    pub property_id: property::Id,

    /// ID of the [`Unit`] this [`Tenant`] lives in.
    pub unit_id: rental::Id,

    /// [`Status`] of this [`Tenant`].
    pub status: Status,

    /// [`DateTime`] when this [`Tenant`] moved in.
    pub moved_in_at: MoveInDateTime,

    /// [`DateTime`] when this [`Tenant`] moved out, if any.
    pub moved_out_at: Option<MoveOutDateTime>,
}

impl Tenant {
    /// Indicates whether this [`Tenant`] still lives in its [`Unit`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Active | Status::NoticeGiven)
    }
}

/// ID of a [`Tenant`].
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
    #[doc = "Status of a [`Tenant`]."]
    enum Status {
        #[doc = "Living in the unit."]
        Active = 1,

        #[doc = "Waiting to move in."]
        Pending = 2,

        #[doc = "Living in the unit, but going to move out."]
        NoticeGiven = 3,

        #[doc = "Moved out."]
        Inactive = 4,
    }
}

/// [`DateTime`] when a [`Tenant`] moved in.
pub type MoveInDateTime = DateTimeOf<(Tenant, unit::Start)>;

/// [`DateTime`] when a [`Tenant`] moved out.
pub type MoveOutDateTime = DateTimeOf<(Tenant, unit::End)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{property, unit as rental, user};

    use super::{Id, Status, Tenant};

    #[test]
    fn tenant_on_notice_still_lives_in_unit() {
        let mut t = Tenant {
            id: Id::new(),
            user_id: user::Id::new(),
            property_id: property::Id::new(),
            unit_id: rental::Id::new(),
            status: Status::Active,
            moved_in_at: DateTime::now().coerce(),
            moved_out_at: None,
        };

        for (status, lives) in [
            (Status::Active, true),
            (Status::NoticeGiven, true),
            (Status::Pending, false),
            (Status::Inactive, false),
        ] {
            t.status = status;
            assert_eq!(t.is_active(), lives, "`{status}` tenant");
        }
    }
}
