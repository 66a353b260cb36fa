//! [`Proprietor`] definitions.

pub mod message;
pub mod ownership;
pub mod report;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

pub use self::{message::Message, ownership::Ownership, report::Report};

/// [`User`] owning (shares of) properties.
#[derive(Clone, Debug)]
pub struct Proprietor {
    /// ID of this [`Proprietor`].
    pub id: Id,

    /// ID of the [`User`] this [`Proprietor`] profile belongs to.
    pub user_id: user::Id,

    /// [`BusinessName`] of this [`Proprietor`], if any.
    pub business_name: Option<BusinessName>,

    /// Official [`RegistrationNumber`] of this [`Proprietor`]'s business, if
    /// any.
    pub registration_number: Option<RegistrationNumber>,

    /// [`Status`] of this [`Proprietor`].
    pub status: Status,

    /// [`DateTime`] when this [`Proprietor`] was registered.
    pub created_at: CreationDateTime,
}

impl Proprietor {
    /// Indicates whether this [`Proprietor`] is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// ID of a [`Proprietor`].
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

/// Name of a [`Proprietor`]'s business.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct BusinessName(String);

impl BusinessName {
    /// Creates a new [`BusinessName`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`BusinessName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`BusinessName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for BusinessName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `BusinessName`")
    }
}

/// Registration number of a [`Proprietor`]'s business.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Creates a new [`RegistrationNumber`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `num` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(num: impl Into<String>) -> Self {
        Self(num.into())
    }

    /// Creates a new [`RegistrationNumber`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: impl Into<String>) -> Option<Self> {
        let num = num.into();
        Self::check(&num).then_some(Self(num))
    }

    /// Checks whether the given `num` is a valid [`RegistrationNumber`].
    fn check(num: impl AsRef<str>) -> bool {
        let num = num.as_ref();
        !num.is_empty()
            && num.len() <= 64
            && num.chars().all(|c| c.is_ascii_alphanumeric() || "-/".contains(c))
    }
}

impl FromStr for RegistrationNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RegistrationNumber`")
    }
}

define_kind! {
    #[doc = "Status of a [`Proprietor`]."]
    enum Status {
        #[doc = "Owning properties."]
        Active = 1,

        #[doc = "Not participating anymore."]
        Inactive = 2,
    }
}

/// [`DateTime`] when a [`Proprietor`] was registered.
pub type CreationDateTime = DateTimeOf<(Proprietor, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{BusinessName, RegistrationNumber};

    #[test]
    fn registration_number_format() {
        assert!(RegistrationNumber::new("PVT-2019/0042").is_some());
        assert!(RegistrationNumber::new("").is_none());
        assert!(RegistrationNumber::new("PVT 42").is_none());
    }

    #[test]
    fn business_name_is_trimmed() {
        assert!(BusinessName::new("Acme Estates").is_some());
        assert!(BusinessName::new(" Acme Estates").is_none());
    }
}
