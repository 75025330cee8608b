use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::domains::assignments::{Assignment, AssignmentOrigin, AssignmentStatus};
use crate::kernel::ServerDeps;

/// Result of one creation in a batch assignment
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub volunteer_id: VolunteerId,
    pub assignment: Option<Assignment>,
    pub error: Option<String>,
}

impl AssignmentOutcome {
    pub fn is_created(&self) -> bool {
        self.assignment.is_some()
    }
}

/// Requester assigns several ranked volunteers at once.
///
/// Creations run concurrently and fail independently; each volunteer gets an
/// outcome in input order.
pub async fn assign_volunteers(
    request_id: RequestId,
    volunteer_ids: &[VolunteerId],
    deps: &ServerDeps,
) -> Vec<AssignmentOutcome> {
    info!(%request_id, volunteers = volunteer_ids.len(), "Assigning volunteers");

    let creations = volunteer_ids.iter().map(|&volunteer_id| async move {
        match deps
            .ledger
            .create_assignment(request_id, volunteer_id, AssignmentOrigin::Requester)
            .await
        {
            Ok(assignment) => AssignmentOutcome {
                volunteer_id,
                assignment: Some(assignment),
                error: None,
            },
            Err(e) => {
                warn!(%request_id, %volunteer_id, error = %e, "Failed to assign volunteer");
                AssignmentOutcome {
                    volunteer_id,
                    assignment: None,
                    error: Some(e.to_string()),
                }
            }
        }
    });

    join_all(creations).await
}

/// Volunteer takes a request themselves; the assignment starts accepted.
pub async fn accept_request(
    request_id: RequestId,
    volunteer_id: VolunteerId,
    deps: &ServerDeps,
) -> Result<Assignment> {
    let assignment = deps
        .ledger
        .create_assignment(request_id, volunteer_id, AssignmentOrigin::SelfAccept)
        .await?;
    Ok(assignment)
}

pub async fn update_assignment_status(
    assignment_id: AssignmentId,
    status: AssignmentStatus,
    deps: &ServerDeps,
) -> Result<Assignment> {
    let assignment = deps
        .ledger
        .update_assignment_status(assignment_id, status)
        .await?;
    Ok(assignment)
}
