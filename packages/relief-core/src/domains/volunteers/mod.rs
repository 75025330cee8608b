//! Volunteer domain - the candidate pool handed to matching
//!
//! Onboarding, identity verification and geocoding are upstream collaborators;
//! this domain only models the resulting records and the queries matching needs.

pub mod models;

// Re-export commonly used types
pub use models::{AvailabilitySchedule, AvailabilityStatus, ScheduleError, VerificationStatus, Volunteer};
