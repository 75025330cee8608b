pub mod schedule;
pub mod volunteer;

pub use schedule::{AvailabilitySchedule, ScheduleError};
pub use volunteer::{AvailabilityStatus, VerificationStatus, Volunteer};
