//! Assignments domain - turns a matching decision into a tracked assignment
//!
//! The ledger owns the assignment lifecycle and the owning request's
//! `volunteers_assigned` counter. Storage is reached through
//! `BaseAssignmentStore`; `store` is the Postgres implementation.

pub mod activities;
pub mod error;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod store;

pub use error::{LedgerError, ParseLedgerEnumError};
pub use ledger::{AssignmentLedger, NewAssignment};
pub use models::{Assignment, AssignmentOrigin, AssignmentStatus};
pub use policy::TransitionPolicy;
pub use store::PostgresAssignmentStore;
