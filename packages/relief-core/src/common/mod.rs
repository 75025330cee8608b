// Common types and utilities shared across the application

pub mod entity_ids;
pub mod id;
pub mod utils;

pub use entity_ids::*;
pub use id::Id;
pub use utils::geo::{distance_km, Coordinate};
