//! Background [`Task`]s definitions.

mod background;
pub mod mark_overdue;

pub use common::Handler as Task;

pub use self::{
    background::{Background, Failure},
    mark_overdue::MarkOverdue,
};
