//! Proprietor [`Message`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{proprietor, user};
#[cfg(doc)]
use crate::domain::{Proprietor, User};

/// Message sent to a [`Proprietor`] by the platform administration.
#[derive(Clone, Debug)]
pub struct Message {
    /// ID of this [`Message`].
    pub id: Id,

    /// ID of the [`Proprietor`] receiving this [`Message`].
    pub proprietor_id: proprietor::Id,

    /// ID of the [`User`] who sent this [`Message`].
    pub sender_id: user::Id,

    /// [`Subject`] of this [`Message`], if any.
    pub subject: Option<Subject>,

    /// [`Body`] of this [`Message`].
    pub body: Body,

    /// [`Kind`] of this [`Message`].
    pub kind: Kind,

    /// Indicator whether the [`Proprietor`] has read this [`Message`].
    pub is_read: bool,

    /// [`DateTime`] when the [`Proprietor`] read this [`Message`].
    pub read_at: Option<ReadingDateTime>,

    /// [`DateTime`] when this [`Message`] was sent.
    pub created_at: CreationDateTime,
}

impl Message {
    /// Marks this [`Message`] as read.
    ///
    /// Returns `false` if it has been read before, keeping the first reading
    /// time.
    pub fn mark_read(&mut self, now: DateTime) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(now.coerce());
        true
    }
}

/// ID of a [`Message`].
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

/// Subject of a [`Message`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Subject(String);

impl Subject {
    /// Creates a new [`Subject`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Subject`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Subject`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 256
    }
}

impl FromStr for Subject {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Subject`")
    }
}

/// Text of a [`Message`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Body(String);

impl Body {
    /// Creates a new [`Body`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Body`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Body`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 8192
    }
}

impl FromStr for Body {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Body`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Message`]."]
    enum Kind {
        #[doc = "Anything."]
        General = 1,

        #[doc = "Something requiring attention."]
        Alert = 2,

        #[doc = "Announcement of a report."]
        Report = 3,

        #[doc = "Informational notice."]
        Notification = 4,
    }
}

/// Marker type describing reading of a [`Message`].
#[derive(Clone, Copy, Debug)]
pub struct Reading;

/// [`DateTime`] when a [`Message`] was sent.
pub type CreationDateTime = DateTimeOf<(Message, unit::Creation)>;

/// [`DateTime`] when a [`Message`] was read.
pub type ReadingDateTime = DateTimeOf<(Message, Reading)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{proprietor, user};

    use super::{Body, Id, Kind, Message};

    #[test]
    fn keeps_first_reading_time() {
        let mut m = Message {
            id: Id::new(),
            proprietor_id: proprietor::Id::new(),
            sender_id: user::Id::new(),
            subject: None,
            body: Body::new("Quarterly report is ready.").unwrap(),
            kind: Kind::General,
            is_read: false,
            read_at: None,
            created_at: DateTime::now().coerce(),
        };

        assert!(m.mark_read(DateTime::now()));
        let first = m.read_at;
        assert!(m.is_read);

        assert!(!m.mark_read(DateTime::now()));
        assert_eq!(m.read_at, first);
    }
}
