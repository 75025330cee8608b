//! Assignment activities - requester and volunteer entry points to the ledger

mod assign;

pub use assign::{accept_request, assign_volunteers, update_assignment_status, AssignmentOutcome};
