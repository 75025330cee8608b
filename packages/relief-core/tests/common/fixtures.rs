//! Test fixtures for creating test data.
//!
//! Rows are inserted through the model methods. Every fixture uses fresh ids so
//! tests sharing the database do not see each other's rows by id.

use anyhow::Result;
use relief_core::common::Coordinate;
use relief_core::domains::requests::{HelpRequest, Urgency};
use relief_core::domains::volunteers::{VerificationStatus, Volunteer};
use sqlx::PgPool;

pub const KOCHI: Coordinate = Coordinate::new(9.93, 76.27);

/// Coordinate `km` due north of Kochi
pub fn north_of_kochi(km: f64) -> Coordinate {
    let deg_per_km = 180.0 / (std::f64::consts::PI * 6371.0);
    Coordinate::new(KOCHI.latitude + km * deg_per_km, KOCHI.longitude)
}

fn tags(skills: &[&str]) -> Vec<String> {
    skills.iter().map(|s| s.to_string()).collect()
}

/// Verified, available volunteer with an unconstrained schedule
pub async fn create_verified_volunteer(
    pool: &PgPool,
    name: &str,
    skills: &[&str],
    at: Coordinate,
) -> Result<Volunteer> {
    Volunteer::builder()
        .full_name(name)
        .skills(tags(skills))
        .latitude(at.latitude)
        .longitude(at.longitude)
        .verification_status(VerificationStatus::Verified)
        .rating(5.0)
        .tasks_completed(20)
        .build()
        .insert(pool)
        .await
}

pub async fn create_pending_volunteer(pool: &PgPool, name: &str) -> Result<Volunteer> {
    Volunteer::builder()
        .full_name(name)
        .build()
        .insert(pool)
        .await
}

pub async fn create_request(
    pool: &PgPool,
    title: &str,
    skills: &[&str],
    urgency: Urgency,
    volunteers_needed: i32,
) -> Result<HelpRequest> {
    HelpRequest::builder()
        .organization_name("Kochi Relief Network")
        .title(title)
        .skills_needed(tags(skills))
        .urgency(urgency)
        .latitude(KOCHI.latitude)
        .longitude(KOCHI.longitude)
        .volunteers_needed(volunteers_needed)
        .build()
        .insert(pool)
        .await
}
