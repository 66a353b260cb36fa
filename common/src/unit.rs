//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing an assignment of an entity to another one.
#[derive(Clone, Copy, Debug)]
pub struct Assignment;

/// Marker type describing a deadline of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Deadline;

/// Marker type describing an entity completion.
#[derive(Clone, Copy, Debug)]
pub struct Completion;

/// Marker type describing an entity start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an entity end.
#[derive(Clone, Copy, Debug)]
pub struct End;
