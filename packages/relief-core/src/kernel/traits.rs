// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The matching rules and the assignment state machine live in the domains and
// talk to storage and wall-clock time through these seams.
//
// Naming convention: Base* for trait names (e.g., BaseClock, BaseAssignmentStore)

use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};

use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::domains::assignments::{Assignment, AssignmentStatus, LedgerError};

// =============================================================================
// Clock Trait (Infrastructure)
// =============================================================================

pub trait BaseClock: Send + Sync {
    /// Current instant, used for assignment timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Weekday in the caller's local time zone, used for availability scoring
    fn today(&self) -> Weekday;
}

// =============================================================================
// Assignment Store Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseAssignmentStore: Send + Sync {
    /// Insert the assignment row and bump the owning request's
    /// `volunteers_assigned` by one, as a single unit.
    ///
    /// Either both effects happen or neither does. Returns the stored row and
    /// the request's new assigned count.
    async fn insert_and_increment(
        &self,
        assignment: &Assignment,
    ) -> Result<(Assignment, i32), LedgerError>;

    async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, LedgerError>;

    /// Persist status and timestamps of `assignment`.
    ///
    /// When `expected` is set the write only applies if the stored status still
    /// equals it. Returns `None` when no row was written.
    async fn save_status(
        &self,
        assignment: &Assignment,
        expected: Option<AssignmentStatus>,
    ) -> Result<Option<Assignment>, LedgerError>;

    /// Assignments for a request, newest first
    async fn find_by_request(&self, request_id: RequestId) -> Result<Vec<Assignment>, LedgerError>;

    /// Assignments for a volunteer, newest first
    async fn find_by_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Assignment>, LedgerError>;

    /// Accepted or in-progress assignments, newest first
    async fn find_active(&self) -> Result<Vec<Assignment>, LedgerError>;
}
