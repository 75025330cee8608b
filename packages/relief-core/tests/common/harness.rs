//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is started on first use and shared by every test in
//! the binary. Migrations run once against it.

use anyhow::{Context, Result};
use chrono::Weekday;
use relief_core::domains::assignments::{AssignmentLedger, PostgresAssignmentStore, TransitionPolicy};
use relief_core::domains::matching::{
    MatchingConfig, MatchingEngine, DEFAULT_GOOD_MATCH_SCORE, DEFAULT_TOP_N,
};
use relief_core::kernel::{FixedClock, ServerDeps};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --ignored --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context on the shared database.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let deps = ctx.deps();
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    /// Pinned to a Wednesday
    pub clock: Arc<FixedClock>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            clock: Arc::new(FixedClock::on(Weekday::Wed)),
        })
    }

    /// Activity dependencies wired to the test database and fixed clock
    pub fn deps(&self) -> ServerDeps {
        self.deps_with_policy(TransitionPolicy::default())
    }

    pub fn deps_with_policy(&self, policy: TransitionPolicy) -> ServerDeps {
        let matching = MatchingEngine::new(MatchingConfig::default(), self.clock.clone());
        let ledger = AssignmentLedger::new(
            Arc::new(PostgresAssignmentStore::new(self.db_pool.clone())),
            self.clock.clone(),
            policy,
        );

        ServerDeps::new(
            self.db_pool.clone(),
            Arc::new(matching),
            Arc::new(ledger),
            DEFAULT_TOP_N,
            DEFAULT_GOOD_MATCH_SCORE,
        )
    }
}
