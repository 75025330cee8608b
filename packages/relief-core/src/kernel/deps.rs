//! Dependencies handed to activities
//!
//! Infrastructure sits behind the kernel traits so activities can run against
//! Postgres in production and in-memory stores in tests.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::assignments::{AssignmentLedger, PostgresAssignmentStore};
use crate::domains::matching::{MatchingConfig, MatchingEngine};
use crate::kernel::{BaseClock, SystemClock};

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub matching: Arc<MatchingEngine>,
    pub ledger: Arc<AssignmentLedger>,
    /// Dashboard default for top-N rankings
    pub top_n: usize,
    /// Threshold for the quick good-match check
    pub good_match_score: u8,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        matching: Arc<MatchingEngine>,
        ledger: Arc<AssignmentLedger>,
        top_n: usize,
        good_match_score: u8,
    ) -> Self {
        Self {
            db_pool,
            matching,
            ledger,
            top_n,
            good_match_score,
        }
    }

    /// Production wiring: system clock, Postgres-backed ledger
    pub fn from_config(db_pool: PgPool, config: &Config) -> Self {
        let clock: Arc<dyn BaseClock> = Arc::new(SystemClock);

        let matching = MatchingEngine::new(
            MatchingConfig {
                radius: config.radius_policy,
                ..MatchingConfig::default()
            },
            clock.clone(),
        );
        let ledger = AssignmentLedger::new(
            Arc::new(PostgresAssignmentStore::new(db_pool.clone())),
            clock,
            config.transition_policy,
        );

        Self::new(
            db_pool,
            Arc::new(matching),
            Arc::new(ledger),
            config.top_n,
            config.good_match_score,
        )
    }
}
