//! Read entities definitions.

pub mod dashboard;
pub mod maintenance;
pub mod property;
pub mod proprietor;
pub mod technician;
pub mod user;

/// Wrapper around an entity indicating that it's in force.
#[derive(Clone, Copy, Debug)]
pub struct Active<T>(pub T);
