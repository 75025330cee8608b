use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::domains::assignments::TransitionPolicy;
use crate::domains::matching::RadiusPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub radius_policy: RadiusPolicy,
    pub top_n: usize,
    pub good_match_score: u8,
    pub transition_policy: TransitionPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = RadiusPolicy::default();
        let radius_policy = RadiusPolicy {
            high_km: env_or("MATCH_RADIUS_HIGH_KM", defaults.high_km)?,
            medium_km: env_or("MATCH_RADIUS_MEDIUM_KM", defaults.medium_km)?,
            low_km: env_or("MATCH_RADIUS_LOW_KM", defaults.low_km)?,
        };
        radius_policy.validate()?;

        let good_match_score: u8 = env_or("MATCH_GOOD_SCORE", 60)?;
        if good_match_score > 100 {
            bail!("MATCH_GOOD_SCORE must be between 0 and 100");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            radius_policy,
            top_n: env_or("MATCH_TOP_N", 10)?,
            good_match_score,
            transition_policy: env::var("ASSIGNMENT_TRANSITIONS")
                .unwrap_or_else(|_| "permissive".to_string())
                .parse()
                .context("ASSIGNMENT_TRANSITIONS must be 'strict' or 'permissive'")?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
