//! [`Technician`] definitions.

pub mod assignment;
pub mod category;
pub mod job;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Rating};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::{maintenance, User};

pub use self::{assignment::Assignment, category::Category};

/// [`User`] resolving [`maintenance::Request`]s of the [`Property`]s they
/// are [`Assignment`]s to.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct Technician {
    /// ID of this [`Technician`].
    pub id: Id,

    /// ID of the [`User`] this [`Technician`] profile belongs to.
    pub user_id: user::Id,

    /// ID of the [`Category`] this [`Technician`] works in.
    pub category_id: category::Id,

    /// Indicator whether this [`Technician`] accepts new jobs.
    pub is_available: bool,

    /// Average [`Rating`] given by tenants for completed jobs.
    pub average_rating: Rating,

    /// Number of ratings the [`Technician::average_rating`] consists of.
    pub ratings_count: u32,

    /// Number of jobs this [`Technician`] has completed.
    pub total_jobs_completed: u32,

    /// [`Status`] of this [`Technician`].
    pub status: Status,

    /// [`DateTime`] when this [`Technician`] was registered.
    pub created_at: CreationDateTime,
}

impl Technician {
    /// Indicates whether this [`Technician`] may be given a new job.
    #[must_use]
    pub fn can_take_jobs(&self) -> bool {
        self.is_available && self.status == Status::Active
    }

    /// Adds the provided job [`Rating`] to the average one.
    pub fn rate(&mut self, rating: Rating) {
        self.average_rating =
            self.average_rating.with_added(self.ratings_count, rating);
        self.ratings_count = self.ratings_count.saturating_add(1);
    }
}

/// Ranks the provided [`Technician`]s for taking a new job in the given
/// [`Category`] (if any), best first.
///
/// Only [`Technician`]s able to take jobs are kept. They are ordered by
/// descending [`Technician::average_rating`], ties are broken by descending
/// [`Technician::total_jobs_completed`]. Equal ones keep the provided order.
#[must_use]
pub fn rank<'t>(
    technicians: impl IntoIterator<Item = &'t Technician>,
    category_id: Option<category::Id>,
) -> Vec<&'t Technician> {
    let mut candidates = technicians
        .into_iter()
        .filter(|t| t.can_take_jobs())
        .filter(|t| category_id.map_or(true, |id| t.category_id == id))
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| {
        b.average_rating
            .cmp(&a.average_rating)
            .then_with(|| b.total_jobs_completed.cmp(&a.total_jobs_completed))
    });
    candidates
}

/// Returns the best [`Technician`] to take a new job in the given
/// [`Category`] (if any), according to the [`rank()`].
#[must_use]
pub fn best_candidate<'t>(
    technicians: impl IntoIterator<Item = &'t Technician>,
    category_id: Option<category::Id>,
) -> Option<&'t Technician> {
    rank(technicians, category_id).into_iter().next()
}

/// ID of a [`Technician`].
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
    #[doc = "Status of a [`Technician`]."]
    enum Status {
        #[doc = "Working."]
        Active = 1,

        #[doc = "Not working anymore."]
        Inactive = 2,

        #[doc = "Forbidden to take jobs."]
        Suspended = 3,
    }
}

/// [`DateTime`] when a [`Technician`] was registered.
pub type CreationDateTime = DateTimeOf<(Technician, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Rating};

    use crate::domain::user;

    use super::{best_candidate, category, rank, Id, Status, Technician};

    fn technician(
        category_id: category::Id,
        rating: &str,
        jobs: u32,
    ) -> Technician {
        Technician {
            id: Id::new(),
            user_id: user::Id::new(),
            category_id,
            is_available: true,
            average_rating: rating.parse().unwrap(),
            ratings_count: jobs,
            total_jobs_completed: jobs,
            status: Status::Active,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn ranks_by_rating_then_jobs() {
        let plumbing = category::Id::new();
        let techs = [
            technician(plumbing, "4.2", 50),
            technician(plumbing, "4.8", 3),
            technician(plumbing, "4.2", 80),
            technician(plumbing, "3.9", 200),
        ];

        let ranked = rank(&techs, None)
            .into_iter()
            .map(|t| t.id)
            .collect::<Vec<_>>();

        assert_eq!(ranked, [techs[1].id, techs[2].id, techs[0].id, techs[3].id]);
    }

    #[test]
    fn skips_unavailable_and_inactive() {
        let plumbing = category::Id::new();
        let mut busy = technician(plumbing, "5", 10);
        busy.is_available = false;
        let mut suspended = technician(plumbing, "5", 10);
        suspended.status = Status::Suspended;
        let ok = technician(plumbing, "1", 0);
        let techs = [busy, suspended, ok.clone()];

        assert_eq!(best_candidate(&techs, None).map(|t| t.id), Some(ok.id));
    }

    #[test]
    fn filters_by_category() {
        let plumbing = category::Id::new();
        let electrical = category::Id::new();
        let techs = [
            technician(electrical, "5", 100),
            technician(plumbing, "3", 1),
        ];

        assert_eq!(
            best_candidate(&techs, Some(plumbing)).map(|t| t.id),
            Some(techs[1].id),
        );
        assert!(best_candidate(&techs, Some(category::Id::new())).is_none());
    }

    #[test]
    fn none_without_candidates() {
        assert!(best_candidate(std::iter::empty(), None).is_none());
    }

    #[test]
    fn rating_is_running_average() {
        let mut t = technician(category::Id::new(), "0", 0);
        t.ratings_count = 0;

        t.rate(Rating::stars(5).unwrap());
        t.rate(Rating::stars(4).unwrap());

        assert_eq!(t.average_rating, "4.5".parse().unwrap());
        assert_eq!(t.ratings_count, 2);
    }
}
