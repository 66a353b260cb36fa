//! [`Lease`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, tenant, unit as rental};
#[cfg(doc)]
use crate::domain::{Property, Tenant, Unit};

/// Rental agreement between a [`Tenant`] and a [`Property`] for a [`Unit`].
#[derive(Clone, Debug)]
pub struct Lease {
    /// ID of this [`Lease`].
    pub id: Id,

    /// ID of the [`Tenant`] renting the [`Unit`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Property`] the [`Unit`] belongs to.
    pub property_id: property::Id,

    /// ID of the rented [`Unit`].
    pub unit_id: rental::Id,

    /// Rent to be paid every month.
    pub monthly_rent: Money,

    /// [`Status`] of this [`Lease`].
    pub status: Status,

    /// [`DateTime`] when this [`Lease`] starts.
    pub starts_at: StartDateTime,

    /// [`DateTime`] when this [`Lease`] ends.
    pub ends_at: EndDateTime,

    /// [`DateTime`] when this [`Lease`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Lease`] was terminated, if it was.
    pub terminated_at: Option<TerminationDateTime>,
}

impl Lease {
    /// Indicates whether this [`Lease`] is still in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// ID of a [`Lease`].
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
    #[doc = "Status of a [`Lease`]."]
    enum Status {
        #[doc = "In force."]
        Active = 1,

        #[doc = "Signed, but not started yet."]
        Pending = 2,

        #[doc = "Ended naturally."]
        Expired = 3,

        #[doc = "Ended before its term."]
        Terminated = 4,
    }
}

/// Marker type describing a [`Lease`] termination.
#[derive(Clone, Copy, Debug)]
pub struct Termination;

/// [`DateTime`] when a [`Lease`] starts.
pub type StartDateTime = DateTimeOf<(Lease, unit::Start)>;

/// [`DateTime`] when a [`Lease`] ends.
pub type EndDateTime = DateTimeOf<(Lease, unit::End)>;

/// [`DateTime`] when a [`Lease`] was created.
pub type CreationDateTime = DateTimeOf<(Lease, unit::Creation)>;

/// [`DateTime`] when a [`Lease`] was terminated.
pub type TerminationDateTime = DateTimeOf<(Lease, Termination)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Money};

    use crate::domain::{property, tenant, unit as rental};

    use super::{Id, Lease, Status};

    #[test]
    fn only_active_lease_is_in_force() {
        let now = DateTime::now();
        let mut lease = Lease {
            id: Id::new(),
            tenant_id: tenant::Id::new(),
            property_id: property::Id::new(),
            unit_id: rental::Id::new(),
            monthly_rent: "18000.00KES".parse::<Money>().unwrap(),
            status: Status::Active,
            starts_at: now.coerce(),
            ends_at: (now + Duration::from_secs(365 * 24 * 60 * 60)).coerce(),
            created_at: now.coerce(),
            terminated_at: None,
        };
        assert!(lease.is_active());

        for status in [Status::Pending, Status::Expired, Status::Terminated] {
            lease.status = status;
            assert!(!lease.is_active(), "`{status}` lease is in force");
        }
    }
}
