// Test dependencies - in-memory implementations of the kernel traits
//
// Used by unit tests and by callers that want to exercise the ledger without a
// database. Each store keeps all state behind one mutex, so every trait call is
// a single critical section.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BaseAssignmentStore, BaseClock};
use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::domains::assignments::{Assignment, AssignmentStatus, LedgerError};

// =============================================================================
// Fixed Clock
// =============================================================================

/// Clock pinned to a chosen instant; tests move it forward explicitly.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midnight UTC on the first `day` on or after 1970-01-01.
    pub fn on(day: Weekday) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let offset = (day.num_days_from_monday() + 7 - epoch.weekday().num_days_from_monday()) % 7;
        Self::at(epoch + Duration::days(i64::from(offset)))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl BaseClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Weekday of the pinned instant, read in UTC
    fn today(&self) -> Weekday {
        self.now().weekday()
    }
}

// =============================================================================
// In-memory Assignment Store
// =============================================================================

#[derive(Default)]
struct LedgerState {
    assigned: HashMap<RequestId, i32>,
    volunteers: Option<HashSet<VolunteerId>>,
    assignments: Vec<Assignment>,
    interference: Option<(AssignmentId, AssignmentStatus)>,
}

/// In-memory [`BaseAssignmentStore`]
///
/// Only requests registered with [`with_request`](Self::with_request) exist.
/// Volunteers are unchecked unless [`with_volunteers`](Self::with_volunteers)
/// was called.
#[derive(Default)]
pub struct InMemoryAssignmentStore {
    state: Mutex<LedgerState>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request with its current assigned count
    pub fn with_request(self, request_id: RequestId, volunteers_assigned: i32) -> Self {
        self.lock().assigned.insert(request_id, volunteers_assigned);
        self
    }

    /// Restrict assignments to the given volunteers
    pub fn with_volunteers<I: IntoIterator<Item = VolunteerId>>(self, volunteers: I) -> Self {
        self.lock()
            .volunteers
            .get_or_insert_with(HashSet::new)
            .extend(volunteers);
        self
    }

    pub fn assigned_count(&self, request_id: RequestId) -> Option<i32> {
        self.lock().assigned.get(&request_id).copied()
    }

    /// Every stored assignment in insertion order
    pub fn assignments(&self) -> Vec<Assignment> {
        self.lock().assignments.clone()
    }

    /// Simulate another writer: right after the next read of `id`, its stored
    /// status becomes `status`.
    pub fn set_status_after_next_read(&self, id: AssignmentId, status: AssignmentStatus) {
        self.lock().interference = Some((id, status));
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn newest_first<F>(&self, keep: F) -> Vec<Assignment>
    where
        F: Fn(&Assignment) -> bool,
    {
        let mut found: Vec<Assignment> = self
            .lock()
            .assignments
            .iter()
            .rev()
            .filter(|a| keep(a))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }
}

#[async_trait]
impl BaseAssignmentStore for InMemoryAssignmentStore {
    async fn insert_and_increment(
        &self,
        assignment: &Assignment,
    ) -> Result<(Assignment, i32), LedgerError> {
        let mut state = self.lock();

        if !state.assigned.contains_key(&assignment.request_id) {
            return Err(LedgerError::RequestNotFound(assignment.request_id));
        }
        if let Some(volunteers) = &state.volunteers {
            if !volunteers.contains(&assignment.volunteer_id) {
                return Err(LedgerError::VolunteerNotFound(assignment.volunteer_id));
            }
        }

        let count = state
            .assigned
            .entry(assignment.request_id)
            .or_insert(0);
        *count += 1;
        let count = *count;

        state.assignments.push(assignment.clone());
        Ok((assignment.clone(), count))
    }

    async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, LedgerError> {
        let mut state = self.lock();
        let found = state.assignments.iter().find(|a| a.id == id).cloned();

        if let Some((target, status)) = state.interference {
            if target == id {
                state.interference = None;
                if let Some(stored) = state.assignments.iter_mut().find(|a| a.id == id) {
                    stored.status = status;
                }
            }
        }

        Ok(found)
    }

    async fn save_status(
        &self,
        assignment: &Assignment,
        expected: Option<AssignmentStatus>,
    ) -> Result<Option<Assignment>, LedgerError> {
        let mut state = self.lock();
        let Some(stored) = state.assignments.iter_mut().find(|a| a.id == assignment.id) else {
            return Ok(None);
        };

        if expected.is_some_and(|status| stored.status != status) {
            return Ok(None);
        }

        stored.status = assignment.status;
        stored.accepted_at = assignment.accepted_at;
        stored.started_at = assignment.started_at;
        stored.completed_at = assignment.completed_at;
        Ok(Some(stored.clone()))
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Vec<Assignment>, LedgerError> {
        Ok(self.newest_first(|a| a.request_id == request_id))
    }

    async fn find_by_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Assignment>, LedgerError> {
        Ok(self.newest_first(|a| a.volunteer_id == volunteer_id))
    }

    async fn find_active(&self) -> Result<Vec<Assignment>, LedgerError> {
        Ok(self.newest_first(|a| a.status.is_active()))
    }
}
