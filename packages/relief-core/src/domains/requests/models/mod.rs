pub mod request;

pub use request::{HelpRequest, RequestFilters, RequestStatus, Urgency};
