use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use typed_builder::TypedBuilder;

use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::domains::assignments::error::ParseLedgerEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 5] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Accepted,
        AssignmentStatus::InProgress,
        AssignmentStatus::Completed,
        AssignmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    /// Accepted or in progress
    pub fn is_active(self) -> bool {
        matches!(self, AssignmentStatus::Accepted | AssignmentStatus::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Cancelled)
    }

    /// Transition table for the strict policy.
    ///
    /// Work moves forward one step at a time and can be cancelled from any
    /// non-terminal state. Staying in the current state is always allowed.
    pub fn can_transition_to(self, next: AssignmentStatus) -> bool {
        use AssignmentStatus::*;

        if self == next {
            return true;
        }

        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Cancelled)
                | (Accepted, InProgress)
                | (Accepted, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = ParseLedgerEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AssignmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseLedgerEnumError {
                kind: "assignment status",
                value: s.to_string(),
            })
    }
}

/// Who initiated the assignment, which decides its starting status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentOrigin {
    /// Requester picked the volunteer from the ranking; waits for the volunteer
    Requester,
    /// Volunteer accepted the request themselves
    SelfAccept,
}

impl AssignmentOrigin {
    pub fn initial_status(self) -> AssignmentStatus {
        match self {
            AssignmentOrigin::Requester => AssignmentStatus::Pending,
            AssignmentOrigin::SelfAccept => AssignmentStatus::Accepted,
        }
    }
}

/// Assignment of one volunteer to one help request
#[derive(FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct Assignment {
    #[builder(default = AssignmentId::new())]
    pub id: AssignmentId,
    pub request_id: RequestId,
    pub volunteer_id: VolunteerId,
    #[builder(default)]
    pub status: AssignmentStatus,

    // Lifecycle timestamps, set when the matching status is entered
    #[builder(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[builder(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[builder(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[builder(default)]
    pub notes: Option<String>,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Unsaved assignment in the origin's starting status, stamped at `now`.
    pub fn draft(
        request_id: RequestId,
        volunteer_id: VolunteerId,
        origin: AssignmentOrigin,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Assignment::builder()
            .request_id(request_id)
            .volunteer_id(volunteer_id)
            .notes(notes)
            .created_at(now)
            .build()
            .with_status(origin.initial_status(), now)
    }

    /// Copy moved to `status`, stamping the timestamp that belongs to it.
    ///
    /// An existing stamp is overwritten when the status is re-entered.
    pub fn with_status(&self, status: AssignmentStatus, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.status = status;
        match status {
            AssignmentStatus::Accepted => next.accepted_at = Some(at),
            AssignmentStatus::InProgress => next.started_at = Some(at),
            AssignmentStatus::Completed => next.completed_at = Some(at),
            AssignmentStatus::Pending | AssignmentStatus::Cancelled => {}
        }
        next
    }
}
