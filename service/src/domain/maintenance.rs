//! Maintenance [`Request`] definitions.

use std::time::Duration;

use common::{define_kind, unit, DateTime, DateTimeOf, Rating};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, technician, unit as rental, user, Technician};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Request to fix something in a [`Property`].
#[derive(Clone, Debug)]
pub struct Request {
    /// ID of this [`Request`].
    pub id: Id,

    /// ID of the [`User`] who reported this [`Request`].
    pub reporter_id: user::Id,

    /// ID of the [`Property`] this [`Request`] is about.
    pub property_id: property::Id,

    /// ID of the [`Unit`] this [`Request`] is about, if any.
    ///
    /// [`Unit`]: crate::domain::Unit
    pub unit_id: Option<rental::Id>,

    /// ID of the [`technician::Category`] this [`Request`] requires, if
    /// known.
    pub category_id: Option<technician::category::Id>,

    /// [`Title`] of this [`Request`].
    pub title: Title,

    /// [`Description`] of the issue.
    pub description: Description,

    /// [`Priority`] of this [`Request`].
    pub priority: Priority,

    /// [`Status`] of this [`Request`].
    pub status: Status,

    /// ID of the [`Technician`] this [`Request`] is assigned to, if any.
    pub technician_id: Option<technician::Id>,

    /// [`DateTime`] the assigned [`Technician`] should respond by.
    pub response_deadline: Option<DeadlineDateTime>,

    /// Indicator whether this [`Request`] was escalated to the property
    /// manager.
    pub is_escalated: bool,

    /// [`DateTime`] when this [`Request`] was escalated, if it was.
    pub escalated_at: Option<EscalationDateTime>,

    /// [`Reason`] of the escalation, if any.
    pub escalation_reason: Option<Reason>,

    /// [`Rating`] given by the reporter once completed.
    pub rating: Option<Rating>,

    /// [`DateTime`] when this [`Request`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Request`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,
}

impl Request {
    /// Indicates whether this [`Request`] still requires some work.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, Status::Pending | Status::InProgress)
    }

    /// Indicates whether this [`Request`] has to be handled by the property
    /// manager manually: it's open and either nobody is assigned to it or it
    /// was escalated.
    #[must_use]
    pub fn needs_manager(&self) -> bool {
        self.is_open() && (self.technician_id.is_none() || self.is_escalated)
    }

    /// Assigns this [`Request`] to the provided [`Technician`], who should
    /// respond within the `response_time`.
    ///
    /// Clears the escalation, as the [`Request`] is handled now.
    ///
    /// # Errors
    ///
    /// If this [`Request`] is not [`Status::Pending`].
    pub fn assign(
        &mut self,
        technician_id: technician::Id,
        response_time: Duration,
        now: DateTime,
    ) -> Result<(), StatusError> {
        if self.status != Status::Pending {
            return Err(StatusError {
                from: self.status,
                to: Status::Pending,
            });
        }
        self.technician_id = Some(technician_id);
        self.response_deadline = Some((now + response_time).coerce());
        self.is_escalated = false;
        self.escalated_at = None;
        self.escalation_reason = None;
        Ok(())
    }

    /// Assigns this [`Request`] to the best of the provided [`Technician`]s
    /// serving its [`Property`], if there is any available.
    ///
    /// Returns the ID of the chosen [`Technician`]. Without candidates, this
    /// [`Request`] stays unassigned and [`Request::needs_manager()`].
    ///
    /// # Errors
    ///
    /// If this [`Request`] is not [`Status::Pending`].
    pub fn auto_assign<'t>(
        &mut self,
        technicians: impl IntoIterator<Item = &'t Technician>,
        response_time: Duration,
        now: DateTime,
    ) -> Result<Option<technician::Id>, StatusError> {
        let Some(best) =
            technician::best_candidate(technicians, self.category_id)
        else {
            return Ok(None);
        };
        self.assign(best.id, response_time, now)?;
        Ok(Some(best.id))
    }

    /// Escalates this [`Request`] to the property manager.
    ///
    /// # Errors
    ///
    /// If this [`Request`] is not open.
    pub fn escalate(
        &mut self,
        reason: Option<Reason>,
        now: DateTime,
    ) -> Result<(), StatusError> {
        if !self.is_open() {
            return Err(StatusError {
                from: self.status,
                to: Status::Pending,
            });
        }
        self.status = Status::Pending;
        self.is_escalated = true;
        self.escalated_at = Some(now.coerce());
        self.escalation_reason = reason;
        Ok(())
    }

    /// Moves this [`Request`] to the provided [`Status`].
    ///
    /// Allowed transitions:
    /// - [`Status::Pending`] to [`Status::InProgress`], once assigned;
    /// - [`Status::InProgress`] to [`Status::Completed`];
    /// - any open [`Status`] to [`Status::Cancelled`].
    ///
    /// # Errors
    ///
    /// If the transition is not allowed.
    pub fn transit(
        &mut self,
        to: Status,
        now: DateTime,
    ) -> Result<(), StatusError> {
        let allowed = match (self.status, to) {
            (Status::Pending, Status::InProgress) => {
                self.technician_id.is_some()
            }
            (Status::InProgress, Status::Completed)
            | (Status::Pending | Status::InProgress, Status::Cancelled) => true,
            (
                Status::Pending
                | Status::InProgress
                | Status::Completed
                | Status::Cancelled,
                _,
            ) => false,
        };
        if !allowed {
            return Err(StatusError {
                from: self.status,
                to,
            });
        }

        self.status = to;
        if to == Status::Completed {
            self.completed_at = Some(now.coerce());
        }
        Ok(())
    }

    /// Rates the job done on this [`Request`].
    ///
    /// # Errors
    ///
    /// If this [`Request`] is not completed or is rated already.
    pub fn rate(&mut self, rating: Rating) -> Result<(), RateError> {
        if self.status != Status::Completed {
            return Err(RateError::NotCompleted);
        }
        if self.rating.is_some() {
            return Err(RateError::AlreadyRated);
        }
        self.rating = Some(rating);
        Ok(())
    }
}

/// Error of an invalid [`Request`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot move from `{from}` to `{to}`")]
pub struct StatusError {
    /// [`Status`] the [`Request`] is in.
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// Error of [`Request::rate()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RateError {
    /// [`Request`] is rated already.
    #[display("request is rated already")]
    AlreadyRated,

    /// [`Request`] is not completed yet.
    #[display("request is not completed")]
    NotCompleted,
}

/// Statistics of [`Request`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of [`Request`]s.
    pub total: u32,

    /// Number of [`Status::Pending`] [`Request`]s.
    pub pending: u32,

    /// Number of [`Status::InProgress`] [`Request`]s.
    pub in_progress: u32,

    /// Number of [`Status::Completed`] [`Request`]s.
    pub completed: u32,

    /// Number of [`Status::Cancelled`] [`Request`]s.
    pub cancelled: u32,

    /// Number of [`Priority::High`] and [`Priority::Emergency`]
    /// [`Request`]s, whatever their [`Status`] is.
    pub urgent: u32,
}

impl Stats {
    /// Collects [`Stats`] of the provided [`Request`]s.
    #[must_use]
    pub fn collect<'r>(requests: impl IntoIterator<Item = &'r Request>) -> Self {
        requests.into_iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status {
                Status::Pending => stats.pending += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Completed => stats.completed += 1,
                Status::Cancelled => stats.cancelled += 1,
            }
            if r.priority.is_urgent() {
                stats.urgent += 1;
            }
            stats
        })
    }
}

/// ID of a [`Request`].
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

/// Short title of a [`Request`].
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

/// Description of a [`Request`] issue.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
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
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Reason of a [`Request`] escalation.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Reason`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Reason`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 2048
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

define_kind! {
    #[doc = "Priority of a [`Request`]."]
    enum Priority {
        #[doc = "Can wait."]
        Low = 1,

        #[doc = "Should be done soon."]
        Medium = 2,

        #[doc = "Should be done as soon as possible."]
        High = 3,

        #[doc = "Threatens health or property."]
        Emergency = 4,
    }
}

impl Priority {
    /// Indicates whether this [`Priority`] requires urgent handling.
    #[must_use]
    pub fn is_urgent(self) -> bool {
        matches!(self, Self::High | Self::Emergency)
    }
}

define_kind! {
    #[doc = "Status of a [`Request`]."]
    enum Status {
        #[doc = "Waiting for a technician."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Done."]
        Completed = 3,

        #[doc = "Not needed anymore."]
        Cancelled = 4,
    }
}

/// Marker type describing a [`Request`] escalation.
#[derive(Clone, Copy, Debug)]
pub struct Escalation;

/// [`DateTime`] a [`Technician`] should respond to a [`Request`] by.
pub type DeadlineDateTime = DateTimeOf<(Request, unit::Deadline)>;

/// [`DateTime`] when a [`Request`] was escalated.
pub type EscalationDateTime = DateTimeOf<(Request, Escalation)>;

/// [`DateTime`] when a [`Request`] was created.
pub type CreationDateTime = DateTimeOf<(Request, unit::Creation)>;

/// [`DateTime`] when a [`Request`] was completed.
pub type CompletionDateTime = DateTimeOf<(Request, unit::Completion)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Rating};

    use crate::domain::{property, technician, user, Technician};

    use super::{
        Description, Id, Priority, RateError, Request, Stats, Status, Title,
    };

    fn request(priority: Priority) -> Request {
        Request {
            id: Id::new(),
            reporter_id: user::Id::new(),
            property_id: property::Id::new(),
            unit_id: None,
            category_id: None,
            title: Title::new("Leaking tap").unwrap(),
            description: Description::new("Kitchen tap drips").unwrap(),
            priority,
            status: Status::Pending,
            technician_id: None,
            response_deadline: None,
            is_escalated: false,
            escalated_at: None,
            escalation_reason: None,
            rating: None,
            created_at: DateTime::now().coerce(),
            completed_at: None,
        }
    }

    #[test]
    fn auto_assigns_best_available() {
        let category = technician::category::Id::new();
        let tech = |rating: &str, jobs, available| Technician {
            id: technician::Id::new(),
            user_id: user::Id::new(),
            category_id: category,
            is_available: available,
            average_rating: rating.parse().unwrap(),
            ratings_count: jobs,
            total_jobs_completed: jobs,
            status: technician::Status::Active,
            created_at: DateTime::now().coerce(),
        };
        let techs = [
            tech("5", 40, false),
            tech("4.5", 2, true),
            tech("4.5", 9, true),
        ];
        let now = DateTime::now();
        let mut r = request(Priority::High);

        let chosen = r
            .auto_assign(&techs, Duration::from_secs(24 * 3600), now)
            .unwrap();

        assert_eq!(chosen, Some(techs[2].id));
        assert_eq!(r.technician_id, Some(techs[2].id));
        assert_eq!(
            r.response_deadline,
            Some((now + Duration::from_secs(24 * 3600)).coerce()),
        );
        assert_eq!(r.status, Status::Pending);
    }

    #[test]
    fn stays_unassigned_without_candidates() {
        let mut r = request(Priority::Low);

        let chosen = r
            .auto_assign(&[], Duration::from_secs(60), DateTime::now())
            .unwrap();

        assert_eq!(chosen, None);
        assert!(r.technician_id.is_none());
        assert!(r.response_deadline.is_none());
        assert!(r.needs_manager());
    }

    #[test]
    fn unassigned_needs_manager() {
        let mut r = request(Priority::Low);
        assert!(r.needs_manager());

        r.assign(technician::Id::new(), Duration::from_secs(3600), DateTime::now())
            .unwrap();
        assert!(!r.needs_manager());

        r.escalate(None, DateTime::now()).unwrap();
        assert!(r.needs_manager());
        assert!(r.escalated_at.is_some());

        r.transit(Status::Cancelled, DateTime::now()).unwrap();
        assert!(!r.needs_manager());
    }

    #[test]
    fn assignment_sets_deadline_and_clears_escalation() {
        let mut r = request(Priority::High);
        r.escalate(None, DateTime::now()).unwrap();
        let now = DateTime::now();

        r.assign(technician::Id::new(), Duration::from_secs(24 * 3600), now)
            .unwrap();

        assert_eq!(
            r.response_deadline,
            Some((now + Duration::from_secs(24 * 3600)).coerce()),
        );
        assert!(!r.is_escalated);
        assert!(r.escalated_at.is_none());
        assert_eq!(r.status, Status::Pending);
    }

    #[test]
    fn escalation_resets_to_pending() {
        let mut r = request(Priority::Medium);
        r.assign(technician::Id::new(), Duration::from_secs(60), DateTime::now())
            .unwrap();
        r.transit(Status::InProgress, DateTime::now()).unwrap();

        r.escalate(None, DateTime::now()).unwrap();

        assert_eq!(r.status, Status::Pending);
        assert!(r.is_escalated);
    }

    #[test]
    fn transitions() {
        let mut r = request(Priority::Low);
        assert!(r.transit(Status::InProgress, DateTime::now()).is_err());
        assert!(r.transit(Status::Completed, DateTime::now()).is_err());

        r.assign(technician::Id::new(), Duration::from_secs(60), DateTime::now())
            .unwrap();
        r.transit(Status::InProgress, DateTime::now()).unwrap();
        r.transit(Status::Completed, DateTime::now()).unwrap();
        assert!(r.completed_at.is_some());

        assert!(r.transit(Status::Cancelled, DateTime::now()).is_err());
        assert!(r.escalate(None, DateTime::now()).is_err());
        assert!(r
            .assign(technician::Id::new(), Duration::from_secs(60), DateTime::now())
            .is_err());
    }

    #[test]
    fn rated_once_after_completion() {
        let mut r = request(Priority::Low);
        let five = Rating::stars(5).unwrap();
        assert_eq!(r.rate(five), Err(RateError::NotCompleted));

        r.status = Status::Completed;
        assert_eq!(r.rate(five), Ok(()));
        assert_eq!(r.rate(five), Err(RateError::AlreadyRated));
    }

    #[test]
    fn stats() {
        let mut requests = vec![
            request(Priority::Low),
            request(Priority::Emergency),
            request(Priority::High),
            request(Priority::Medium),
            request(Priority::High),
        ];
        requests[1].status = Status::InProgress;
        requests[2].status = Status::Completed;
        requests[3].status = Status::Cancelled;

        assert_eq!(
            Stats::collect(&requests),
            Stats {
                total: 5,
                pending: 2,
                in_progress: 1,
                completed: 1,
                cancelled: 1,
                urgent: 3,
            },
        );
        assert_eq!(Stats::collect(std::iter::empty()), Stats::default());
    }
}
