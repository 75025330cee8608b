//! Matching domain - ranks verified volunteers for a help request
//!
//! `utils` holds the pure sub-scorers and policy tables, `engine` composes them,
//! `activities` load snapshots from the database and run the engine.

pub mod activities;
pub mod engine;
pub mod utils;

// Re-export commonly used types
pub use engine::{
    Exclusion, MatchResult, MatchingConfig, MatchingEngine, ScoreBreakdown, DEFAULT_GOOD_MATCH_SCORE,
    DEFAULT_TOP_N,
};
pub use utils::{RadiusPolicy, Weights, COMPOSITE_WEIGHTS};
