//! Caretaker [`Duty`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf, Rating};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{caretaker, property, user};
#[cfg(doc)]
use crate::domain::{Caretaker, Property, User};

/// Task given to a [`Caretaker`] by a property manager.
#[derive(Clone, Debug)]
pub struct Duty {
    /// ID of this [`Duty`].
    pub id: Id,

    /// ID of the [`Caretaker`] this [`Duty`] is given to.
    pub caretaker_id: caretaker::Id,

    /// ID of the [`Property`] this [`Duty`] is performed at.
    pub property_id: property::Id,

    /// ID of the [`User`] who gave this [`Duty`].
    pub assigned_by: user::Id,

    /// [`Title`] of this [`Duty`].
    pub title: Title,

    /// Details of this [`Duty`], if any.
    pub description: Option<Text>,

    /// [`Kind`] of this [`Duty`].
    pub kind: Kind,

    /// [`Priority`] of this [`Duty`].
    pub priority: Priority,

    /// [`Status`] of this [`Duty`].
    pub status: Status,

    /// [`DateTime`] this [`Duty`] should be done by, if any.
    pub due_at: Option<DueDateTime>,

    /// [`DateTime`] when the [`Caretaker`] started this [`Duty`].
    pub started_at: Option<StartDateTime>,

    /// [`DateTime`] when the [`Caretaker`] completed this [`Duty`].
    pub completed_at: Option<CompletionDateTime>,

    /// Report of the [`Caretaker`] on the completed [`Duty`].
    pub report: Option<Text>,

    /// Feedback of the reviewer on the [`Duty::report`].
    pub feedback: Option<Text>,

    /// [`Rating`] of the done job given by the reviewer.
    pub rating: Option<Rating>,

    /// [`DateTime`] when this [`Duty`] was reviewed.
    pub reviewed_at: Option<ReviewDateTime>,

    /// [`DateTime`] when this [`Duty`] was created.
    pub created_at: CreationDateTime,
}

impl Duty {
    /// Indicates whether this [`Duty`] still requires some work.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            Status::Pending | Status::InProgress | Status::Overdue,
        )
    }

    /// Indicates whether this [`Duty`] should become [`Status::Overdue`] at
    /// the provided moment.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime) -> bool {
        self.status == Status::Pending
            && self.due_at.is_some_and(|due| due < now.coerce())
    }

    /// Starts working on this [`Duty`].
    ///
    /// # Errors
    ///
    /// If this [`Duty`] was started or closed already.
    pub fn start(&mut self, now: DateTime) -> Result<(), StatusError> {
        if !matches!(self.status, Status::Pending | Status::Overdue) {
            return Err(self.status_error(Status::InProgress));
        }
        self.status = Status::InProgress;
        self.started_at = Some(now.coerce());
        Ok(())
    }

    /// Completes this [`Duty`] with the provided report.
    ///
    /// # Errors
    ///
    /// If this [`Duty`] is closed already.
    pub fn complete(
        &mut self,
        report: Text,
        now: DateTime,
    ) -> Result<(), StatusError> {
        if !self.is_open() {
            return Err(self.status_error(Status::Completed));
        }
        if self.started_at.is_none() {
            self.started_at = Some(now.coerce());
        }
        self.status = Status::Completed;
        self.completed_at = Some(now.coerce());
        self.report = Some(report);
        Ok(())
    }

    /// Reviews this completed [`Duty`].
    ///
    /// Repeated reviews replace the previous one.
    ///
    /// # Errors
    ///
    /// If this [`Duty`] is not completed.
    pub fn review(
        &mut self,
        feedback: Option<Text>,
        rating: Rating,
        now: DateTime,
    ) -> Result<(), StatusError> {
        if self.status != Status::Completed {
            return Err(self.status_error(Status::Completed));
        }
        self.feedback = feedback;
        self.rating = Some(rating);
        self.reviewed_at = Some(now.coerce());
        Ok(())
    }

    /// Cancels this [`Duty`].
    ///
    /// # Errors
    ///
    /// If this [`Duty`] is closed already.
    pub fn cancel(&mut self) -> Result<(), StatusError> {
        if !self.is_open() {
            return Err(self.status_error(Status::Cancelled));
        }
        self.status = Status::Cancelled;
        Ok(())
    }

    /// Creates a [`StatusError`] of moving this [`Duty`] to the provided
    /// [`Status`].
    fn status_error(&self, to: Status) -> StatusError {
        StatusError {
            from: self.status,
            to,
        }
    }
}

/// Error of an invalid [`Duty`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot move from `{from}` to `{to}`")]
pub struct StatusError {
    /// [`Status`] the [`Duty`] is in.
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// Statistics of [`Duty`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of [`Duty`]s.
    pub total: u32,

    /// Number of [`Status::Completed`] [`Duty`]s.
    pub completed: u32,

    /// Number of [`Status::Pending`] [`Duty`]s.
    pub pending: u32,

    /// Number of [`Status::InProgress`] [`Duty`]s.
    pub in_progress: u32,

    /// Number of [`Status::Overdue`] [`Duty`]s.
    pub overdue: u32,

    /// Average [`Rating`] of the reviewed [`Duty`]s, rounded to one decimal
    /// place.
    pub average_rating: Option<Rating>,
}

impl Stats {
    /// Collects [`Stats`] of the provided [`Duty`]s.
    #[must_use]
    pub fn collect<'d>(duties: impl IntoIterator<Item = &'d Duty>) -> Self {
        let mut ratings = vec![];
        let mut stats =
            duties.into_iter().fold(Self::default(), |mut stats, d| {
                stats.total += 1;
                match d.status {
                    Status::Completed => stats.completed += 1,
                    Status::Pending => stats.pending += 1,
                    Status::InProgress => stats.in_progress += 1,
                    Status::Overdue => stats.overdue += 1,
                    Status::Cancelled => {}
                }
                ratings.extend(d.rating);
                stats
            });
        stats.average_rating = Rating::average(ratings);
        stats
    }
}

/// ID of a [`Duty`].
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

/// Title of a [`Duty`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
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

/// Free-form text of a [`Duty`] description, report or feedback.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Text(String);

impl Text {
    /// Creates a new [`Text`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Text`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Text`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Text {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Text`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Duty`]."]
    enum Kind {
        #[doc = "General errand."]
        General = 1,

        #[doc = "Cleaning."]
        Cleaning = 2,

        #[doc = "Security round."]
        Security = 3,

        #[doc = "Minor maintenance."]
        Maintenance = 4,

        #[doc = "Inspection of premises."]
        Inspection = 5,

        #[doc = "Anything else."]
        Other = 6,
    }
}

define_kind! {
    #[doc = "Priority of a [`Duty`]."]
    enum Priority {
        #[doc = "Can wait."]
        Low = 1,

        #[doc = "Ordinary."]
        Medium = 2,

        #[doc = "Should be done soon."]
        High = 3,

        #[doc = "Should be done immediately."]
        Urgent = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Duty`]."]
    enum Status {
        #[doc = "Not started yet."]
        Pending = 1,

        #[doc = "Being performed."]
        InProgress = 2,

        #[doc = "Done and reported."]
        Completed = 3,

        #[doc = "Not needed anymore."]
        Cancelled = 4,

        #[doc = "Not started by its due date."]
        Overdue = 5,
    }
}

/// Marker type describing a [`Duty`] review.
#[derive(Clone, Copy, Debug)]
pub struct Review;

/// [`DateTime`] a [`Duty`] should be done by.
pub type DueDateTime = DateTimeOf<(Duty, unit::Deadline)>;

/// [`DateTime`] when a [`Duty`] was started.
pub type StartDateTime = DateTimeOf<(Duty, unit::Start)>;

/// [`DateTime`] when a [`Duty`] was completed.
pub type CompletionDateTime = DateTimeOf<(Duty, unit::Completion)>;

/// [`DateTime`] when a [`Duty`] was reviewed.
pub type ReviewDateTime = DateTimeOf<(Duty, Review)>;

/// [`DateTime`] when a [`Duty`] was created.
pub type CreationDateTime = DateTimeOf<(Duty, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Rating};

    use crate::domain::{caretaker, property, user};

    use super::{Duty, Id, Kind, Priority, Stats, Status, Text, Title};

    fn duty() -> Duty {
        Duty {
            id: Id::new(),
            caretaker_id: caretaker::Id::new(),
            property_id: property::Id::new(),
            assigned_by: user::Id::new(),
            title: Title::new("Clean the stairs").unwrap(),
            description: None,
            kind: Kind::Cleaning,
            priority: Priority::Medium,
            status: Status::Pending,
            due_at: None,
            started_at: None,
            completed_at: None,
            report: None,
            feedback: None,
            rating: None,
            reviewed_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn text(s: &str) -> Text {
        Text::new(s).unwrap()
    }

    #[test]
    fn lifecycle() {
        let mut d = duty();

        d.start(DateTime::now()).unwrap();
        assert_eq!(d.status, Status::InProgress);
        assert!(d.start(DateTime::now()).is_err());

        d.complete(text("Done, all clean"), DateTime::now()).unwrap();
        assert_eq!(d.status, Status::Completed);
        assert!(d.completed_at.is_some());
        assert!(d.cancel().is_err());

        d.review(Some(text("Good job")), Rating::stars(4).unwrap(), DateTime::now())
            .unwrap();
        assert_eq!(d.rating, Rating::stars(4));
        assert!(d.reviewed_at.is_some());
    }

    #[test]
    fn review_requires_completion() {
        let mut d = duty();

        assert!(d
            .review(None, Rating::stars(5).unwrap(), DateTime::now())
            .is_err());
        assert!(d.rating.is_none());
    }

    #[test]
    fn overdue_duty_can_still_be_started() {
        let mut d = duty();
        d.due_at = Some((DateTime::now() - Duration::from_secs(60)).coerce());

        assert!(d.is_overdue_at(DateTime::now()));
        d.status = Status::Overdue;
        assert!(!d.is_overdue_at(DateTime::now()));

        d.start(DateTime::now()).unwrap();
        assert_eq!(d.status, Status::InProgress);
    }

    #[test]
    fn no_due_date_is_never_overdue() {
        let d = duty();

        assert!(!d.is_overdue_at(DateTime::now() + Duration::from_secs(1 << 30)));
    }

    #[test]
    fn stats() {
        let mut duties = vec![duty(), duty(), duty(), duty(), duty(), duty()];
        duties[0].status = Status::Completed;
        duties[0].rating = Rating::stars(4);
        duties[1].status = Status::Completed;
        duties[1].rating = Rating::stars(5);
        duties[2].status = Status::Completed;
        duties[2].rating = Rating::stars(5);
        duties[3].status = Status::InProgress;
        duties[4].status = Status::Overdue;

        assert_eq!(
            Stats::collect(&duties),
            Stats {
                total: 6,
                completed: 3,
                pending: 1,
                in_progress: 1,
                overdue: 1,
                average_rating: Some("4.7".parse().unwrap()),
            },
        );
    }
}
