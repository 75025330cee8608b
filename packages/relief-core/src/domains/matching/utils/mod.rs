pub mod radius;
pub mod scoring;
pub mod weights;

pub use radius::RadiusPolicy;
pub use scoring::*;
pub use weights::{Weights, COMPOSITE_WEIGHTS};
