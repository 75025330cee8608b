//! Kernel module - infrastructure traits and dependencies.

pub mod clock;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use clock::SystemClock;
pub use deps::ServerDeps;
pub use test_dependencies::{FixedClock, InMemoryAssignmentStore};
pub use traits::*;
