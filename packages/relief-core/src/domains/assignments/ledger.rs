use std::sync::Arc;

use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use super::error::LedgerError;
use super::models::{Assignment, AssignmentOrigin, AssignmentStatus};
use super::policy::TransitionPolicy;
use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::kernel::{BaseAssignmentStore, BaseClock};

/// Input for [`AssignmentLedger::create`]
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewAssignment {
    pub request_id: RequestId,
    pub volunteer_id: VolunteerId,
    pub origin: AssignmentOrigin,
    #[builder(default, setter(strip_option, into))]
    pub notes: Option<String>,
}

/// Creates assignments and moves them through their lifecycle.
///
/// Creation and the owning request's `volunteers_assigned` increment are one
/// unit of work in the store. The counter is never decremented, including on
/// cancellation.
pub struct AssignmentLedger {
    store: Arc<dyn BaseAssignmentStore>,
    clock: Arc<dyn BaseClock>,
    policy: TransitionPolicy,
}

impl AssignmentLedger {
    pub fn new(
        store: Arc<dyn BaseAssignmentStore>,
        clock: Arc<dyn BaseClock>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub async fn create_assignment(
        &self,
        request_id: RequestId,
        volunteer_id: VolunteerId,
        origin: AssignmentOrigin,
    ) -> Result<Assignment, LedgerError> {
        self.create(
            NewAssignment::builder()
                .request_id(request_id)
                .volunteer_id(volunteer_id)
                .origin(origin)
                .build(),
        )
        .await
    }

    pub async fn create(&self, new: NewAssignment) -> Result<Assignment, LedgerError> {
        let draft = Assignment::draft(
            new.request_id,
            new.volunteer_id,
            new.origin,
            new.notes,
            self.clock.now(),
        );

        let (assignment, volunteers_assigned) = self.store.insert_and_increment(&draft).await?;

        info!(
            assignment_id = %assignment.id,
            request_id = %assignment.request_id,
            volunteer_id = %assignment.volunteer_id,
            status = %assignment.status,
            volunteers_assigned,
            "Assignment created"
        );

        Ok(assignment)
    }

    /// Move an assignment to `status`, stamping the matching timestamp.
    ///
    /// Under the strict policy the write only lands if nobody changed the
    /// status since it was read; otherwise `StatusChanged` is returned.
    pub async fn update_assignment_status(
        &self,
        id: AssignmentId,
        status: AssignmentStatus,
    ) -> Result<Assignment, LedgerError> {
        let current = self
            .store
            .find_assignment(id)
            .await?
            .ok_or(LedgerError::AssignmentNotFound(id))?;

        self.policy.check(current.status, status)?;

        let next = current.with_status(status, self.clock.now());
        let expected = self.policy.expected_status(current.status);

        match self.store.save_status(&next, expected).await? {
            Some(saved) => {
                debug!(assignment_id = %id, from = %current.status, to = %status, "Assignment status updated");
                Ok(saved)
            }
            None => match self.store.find_assignment(id).await? {
                None => Err(LedgerError::AssignmentNotFound(id)),
                Some(latest) => {
                    warn!(
                        assignment_id = %id,
                        expected = %current.status,
                        found = %latest.status,
                        "Assignment status changed concurrently"
                    );
                    Err(LedgerError::StatusChanged {
                        id,
                        expected: current.status,
                        found: latest.status,
                    })
                }
            },
        }
    }

    pub async fn find(&self, id: AssignmentId) -> Result<Option<Assignment>, LedgerError> {
        self.store.find_assignment(id).await
    }

    pub async fn assignments_for_request(
        &self,
        request_id: RequestId,
    ) -> Result<Vec<Assignment>, LedgerError> {
        self.store.find_by_request(request_id).await
    }

    pub async fn assignments_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Assignment>, LedgerError> {
        self.store.find_by_volunteer(volunteer_id).await
    }

    pub async fn active_assignments(&self) -> Result<Vec<Assignment>, LedgerError> {
        self.store.find_active().await
    }
}
