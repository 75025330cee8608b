//! Requests domain - help requests that volunteers are matched against

pub mod models;

// Re-export commonly used types
pub use models::{HelpRequest, RequestFilters, RequestStatus, Urgency};
