use thiserror::Error;

use super::models::AssignmentStatus;
use crate::common::{AssignmentId, RequestId, VolunteerId};

/// Failures reported by the assignment ledger
///
/// None of these are retried internally. Not-found and transition errors are
/// final for the given input; `StatusChanged` means another writer got there
/// first and the caller may re-read and try again.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("Volunteer not found: {0}")]
    VolunteerNotFound(VolunteerId),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    #[error("Cannot move assignment from {from} to {to}")]
    InvalidTransition {
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    #[error("Assignment {id} moved from {expected} to {found} concurrently")]
    StatusChanged {
        id: AssignmentId,
        expected: AssignmentStatus,
        found: AssignmentStatus,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::RequestNotFound(_)
                | LedgerError::VolunteerNotFound(_)
                | LedgerError::AssignmentNotFound(_)
        )
    }
}

/// Unrecognised value for a ledger enum coming from text input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value:?}")]
pub struct ParseLedgerEnumError {
    pub kind: &'static str,
    pub value: String,
}
