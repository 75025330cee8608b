//! CLI for running matching and the assignment ledger against the database
//!
//! Every command prints one JSON document on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relief_core::common::{AssignmentId, RequestId, VolunteerId};
use relief_core::domains::assignments::activities::{
    accept_request, assign_volunteers, update_assignment_status,
};
use relief_core::domains::assignments::AssignmentStatus;
use relief_core::domains::matching::activities::{
    check_match, find_matches_for_request, match_open_requests,
};
use relief_core::kernel::ServerDeps;
use relief_core::Config;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "match_cli")]
#[command(about = "Volunteer matching and assignment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Rank verified volunteers for one request
    Match {
        request_id: RequestId,
        /// Number of candidates to return (defaults to MATCH_TOP_N)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rank volunteers for every open request
    Open {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Check whether a volunteer is a good match for a request
    Check {
        request_id: RequestId,
        volunteer_id: VolunteerId,
    },

    /// Assign volunteers to a request on the requester's behalf
    Assign {
        request_id: RequestId,
        #[arg(required = true)]
        volunteer_ids: Vec<VolunteerId>,
    },

    /// Volunteer accepts a request
    Accept {
        request_id: RequestId,
        volunteer_id: VolunteerId,
    },

    /// Move an assignment to a new status
    Status {
        assignment_id: AssignmentId,
        status: AssignmentStatus,
    },
}

#[derive(Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn output<T: Serialize>(result: Result<T>) -> Result<()> {
    let response = match result {
        Ok(data) => Response {
            success: true,
            data: Some(data),
            error: None,
        },
        Err(e) => Response {
            success: false,
            data: None,
            error: Some(format!("{e:#}")),
        },
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relief_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config).await?;

    let deps = ServerDeps::from_config(pool, &config);

    match cli.command {
        Commands::Migrate => output(cmd_migrate(&deps.db_pool).await),
        Commands::Match { request_id, limit } => output(
            find_matches_for_request(request_id, limit.unwrap_or(deps.top_n), &deps).await,
        ),
        Commands::Open { limit } => {
            output(match_open_requests(limit.unwrap_or(deps.top_n), &deps).await)
        }
        Commands::Check {
            request_id,
            volunteer_id,
        } => output(check_match(request_id, volunteer_id, &deps).await),
        Commands::Assign {
            request_id,
            volunteer_ids,
        } => output(Ok(assign_volunteers(request_id, &volunteer_ids, &deps).await)),
        Commands::Accept {
            request_id,
            volunteer_id,
        } => output(accept_request(request_id, volunteer_id, &deps).await),
        Commands::Status {
            assignment_id,
            status,
        } => output(update_assignment_status(assignment_id, status, &deps).await),
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate(pool: &PgPool) -> Result<&'static str> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");
    Ok("migrations applied")
}
