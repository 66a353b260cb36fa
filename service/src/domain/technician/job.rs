//! Job [`Update`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{maintenance, technician, user};
#[cfg(doc)]
use crate::domain::{MaintenanceRequest, Technician, User};

/// Entry in the log of a [`Technician`]'s work upon a
/// [`MaintenanceRequest`].
#[derive(Clone, Debug)]
pub struct Update {
    /// ID of this [`Update`].
    pub id: Id,

    /// ID of the [`MaintenanceRequest`] this [`Update`] is about.
    pub request_id: maintenance::Id,

    /// ID of the [`Technician`] working on the [`MaintenanceRequest`].
    pub technician_id: technician::Id,

    /// [`Status`] of the job reported by this [`Update`].
    pub status: Status,

    /// [`Notes`] left by the [`Technician`], if any.
    pub notes: Option<Notes>,

    /// [`Kind`] of this [`Update`].
    pub kind: Kind,

    /// ID of the [`User`] who posted this [`Update`].
    pub created_by: user::Id,

    /// [`DateTime`] when this [`Update`] was posted.
    pub created_at: CreationDateTime,
}

/// ID of a job [`Update`].
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

/// Free-form notes of a job [`Update`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Notes(String);

impl Notes {
    /// Creates new [`Notes`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates new [`Notes`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is valid [`Notes`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

define_kind! {
    #[doc = "Status of a job reported by an [`Update`]."]
    enum Status {
        #[doc = "Job is accepted by the [`Technician`]."]
        Accepted = 1,

        #[doc = "Work is being done."]
        InProgress = 2,

        #[doc = "Work is done."]
        Completed = 3,

        #[doc = "Job is declined by the [`Technician`]."]
        Rejected = 4,

        #[doc = "Work is paused."]
        OnHold = 5,
    }
}

define_kind! {
    #[doc = "Kind of a job [`Update`]."]
    enum Kind {
        #[doc = "Change of the job [`Status`]."]
        StatusChange = 1,

        #[doc = "Plain comment."]
        Comment = 2,

        #[doc = "Change of the work schedule."]
        ScheduleUpdate = 3,
    }
}

/// [`DateTime`] when a job [`Update`] was posted.
pub type CreationDateTime = DateTimeOf<(Update, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Notes;

    #[test]
    fn notes_must_have_text() {
        assert!(Notes::new("Replaced the valve, waiting for parts.").is_some());
        assert!(Notes::new("   ").is_none());
        assert!(Notes::new("x".repeat(4097)).is_none());
    }
}
