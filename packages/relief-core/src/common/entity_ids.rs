//! Typed ids for the records the engine reads and writes.

pub use super::id::Id;

/// Marker type for volunteer records.
pub struct Volunteer;

/// Marker type for help requests.
pub struct HelpRequest;

/// Marker type for assignments linking a volunteer to a request.
pub struct Assignment;

pub type VolunteerId = Id<Volunteer>;

pub type RequestId = Id<HelpRequest>;

pub type AssignmentId = Id<Assignment>;
