//! Proprietor [`Report`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, proprietor, user};
#[cfg(doc)]
use crate::domain::{Property, Proprietor, User};

/// Report about a [`Property`] prepared for its [`Proprietor`].
#[derive(Clone, Debug)]
pub struct Report {
    /// ID of this [`Report`].
    pub id: Id,

    /// ID of the [`Proprietor`] this [`Report`] is addressed to.
    pub proprietor_id: proprietor::Id,

    /// ID of the [`Property`] this [`Report`] is about.
    pub property_id: property::Id,

    /// [`Kind`] of this [`Report`].
    pub kind: Kind,

    /// [`Title`] of this [`Report`].
    pub title: Title,

    /// [`Description`] of this [`Report`], if any.
    pub description: Option<Description>,

    /// [`Status`] of this [`Report`].
    pub status: Status,

    /// ID of the [`User`] who prepared this [`Report`].
    pub created_by: user::Id,

    /// [`DateTime`] when this [`Report`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Report`] was changed the last time.
    pub updated_at: UpdateDateTime,

    /// [`DateTime`] when this [`Report`] was sent to its [`Proprietor`].
    pub sent_at: Option<SendingDateTime>,
}

impl Report {
    /// Indicates whether this [`Report`] is sent to its [`Proprietor`]
    /// already.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.status == Status::Sent
    }

    /// Changes this [`Report`] while it's not sent yet.
    ///
    /// # Errors
    ///
    /// - If this [`Report`] is sent already.
    /// - If the `status` is [`Status::Sent`], which is only reachable via
    ///   [`Report::send()`].
    pub fn change(
        &mut self,
        title: Option<Title>,
        description: Option<Option<Description>>,
        status: Option<Status>,
        now: DateTime,
    ) -> Result<(), ChangeError> {
        if self.is_sent() {
            return Err(ChangeError::AlreadySent);
        }
        if status == Some(Status::Sent) {
            return Err(ChangeError::SentStatus);
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = now.coerce();
        Ok(())
    }

    /// Sends this [`Report`] to its [`Proprietor`].
    ///
    /// # Errors
    ///
    /// If this [`Report`] is sent already.
    pub fn send(&mut self, now: DateTime) -> Result<(), ChangeError> {
        if self.is_sent() {
            return Err(ChangeError::AlreadySent);
        }
        self.status = Status::Sent;
        self.sent_at = Some(now.coerce());
        self.updated_at = now.coerce();
        Ok(())
    }
}

/// Error of changing a [`Report`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ChangeError {
    /// [`Report`] is sent already.
    #[display("`Report` is sent already")]
    AlreadySent,

    /// [`Status::Sent`] is requested outside of [`Report::send()`].
    #[display("`Report` can become sent only by sending it")]
    SentStatus,
}

/// ID of a [`Report`].
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

/// Title of a [`Report`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 256
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Report`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 8192
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Report`]."]
    enum Kind {
        #[doc = "Monthly summary."]
        Monthly = 1,

        #[doc = "Quarterly summary."]
        Quarterly = 2,

        #[doc = "Annual summary."]
        Annual = 3,

        #[doc = "Occupancy of the [`Property`]."]
        Occupancy = 4,

        #[doc = "Income and expenses of the [`Property`]."]
        Financial = 5,

        #[doc = "Maintenance done in the [`Property`]."]
        Maintenance = 6,
    }
}

define_kind! {
    #[doc = "Status of a [`Report`]."]
    enum Status {
        #[doc = "Being prepared."]
        Draft = 1,

        #[doc = "Awaits approval."]
        Pending = 2,

        #[doc = "Approved, but not sent yet."]
        Approved = 3,

        #[doc = "Sent to the [`Proprietor`]."]
        Sent = 4,
    }
}

/// Marker type describing a [`Report`] update.
#[derive(Clone, Copy, Debug)]
pub struct Change;

/// Marker type describing sending of a [`Report`].
#[derive(Clone, Copy, Debug)]
pub struct Sending;

/// [`DateTime`] when a [`Report`] was created.
pub type CreationDateTime = DateTimeOf<(Report, unit::Creation)>;

/// [`DateTime`] when a [`Report`] was changed.
pub type UpdateDateTime = DateTimeOf<(Report, Change)>;

/// [`DateTime`] when a [`Report`] was sent.
pub type SendingDateTime = DateTimeOf<(Report, Sending)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{property, proprietor, user};

    use super::{ChangeError, Description, Id, Kind, Report, Status, Title};

    fn draft() -> Report {
        let now = DateTime::now();
        Report {
            id: Id::new(),
            proprietor_id: proprietor::Id::new(),
            property_id: property::Id::new(),
            kind: Kind::Monthly,
            title: Title::new("March 2025").unwrap(),
            description: None,
            status: Status::Draft,
            created_by: user::Id::new(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
            sent_at: None,
        }
    }

    #[test]
    fn changes_unsent_report() {
        let mut r = draft();

        r.change(
            Some(Title::new("March 2025 (final)").unwrap()),
            Some(Some(Description::new("All units let.").unwrap())),
            Some(Status::Approved),
            DateTime::now(),
        )
        .unwrap();

        assert_eq!(r.title.to_string(), "March 2025 (final)");
        assert_eq!(r.status, Status::Approved);
        assert!(r.description.is_some());

        r.change(None, Some(None), None, DateTime::now()).unwrap();
        assert!(r.description.is_none());
        assert_eq!(r.status, Status::Approved);
    }

    #[test]
    fn sent_status_is_reached_only_by_sending() {
        let mut r = draft();

        assert_eq!(
            r.change(None, None, Some(Status::Sent), DateTime::now()),
            Err(ChangeError::SentStatus),
        );
        assert_eq!(r.status, Status::Draft);

        r.send(DateTime::now()).unwrap();
        assert_eq!(r.status, Status::Sent);
        assert!(r.sent_at.is_some());
    }

    #[test]
    fn sent_report_is_frozen() {
        let mut r = draft();
        r.send(DateTime::now()).unwrap();

        assert_eq!(r.send(DateTime::now()), Err(ChangeError::AlreadySent));
        assert_eq!(
            r.change(
                Some(Title::new("Other").unwrap()),
                None,
                None,
                DateTime::now(),
            ),
            Err(ChangeError::AlreadySent),
        );
        assert_eq!(r.title.to_string(), "March 2025");
    }
}
