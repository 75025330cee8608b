use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use typed_builder::TypedBuilder;

use super::schedule::AvailabilitySchedule;
use crate::common::{Coordinate, VolunteerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "availability_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Busy,
    Offline,
}

/// Volunteer model - SQL persistence layer
///
/// Onboarding and identity verification write these rows; matching only reads
/// them. Skills are free-text tags compared case-insensitively.
#[derive(FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Volunteer {
    #[builder(default = VolunteerId::new())]
    pub id: VolunteerId,
    pub full_name: String,
    #[builder(default)]
    pub skills: Vec<String>,

    // Location (coarse precision, resolved upstream by geocoding)
    #[builder(default, setter(strip_option))]
    pub latitude: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub longitude: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub location_name: Option<String>,

    // Status
    #[builder(default)]
    pub verification_status: VerificationStatus,
    #[builder(default)]
    pub availability_status: AvailabilityStatus,
    #[builder(default)]
    #[sqlx(try_from = "Vec<String>")]
    pub availability_schedule: AvailabilitySchedule,

    // Track record
    #[builder(default = 0.0)]
    pub rating: f64,
    #[builder(default = 0)]
    pub tasks_completed: i32,

    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Volunteer {
    /// Location when both halves are known
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// Find volunteer by ID
    pub async fn find_by_id(id: VolunteerId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM volunteers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all verified volunteers (the matching pool)
    pub async fn find_verified(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM volunteers
             WHERE verification_status = 'verified'
             ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new volunteer
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO volunteers (
                id,
                full_name,
                skills,
                latitude,
                longitude,
                location_name,
                verification_status,
                availability_status,
                availability_schedule,
                rating,
                tasks_completed,
                created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(self.id)
        .bind(&self.full_name)
        .bind(&self.skills)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(&self.location_name)
        .bind(self.verification_status)
        .bind(self.availability_status)
        .bind(self.availability_schedule.codes())
        .bind(self.rating)
        .bind(self.tasks_completed)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update availability status. Returns `None` if the volunteer does not exist.
    pub async fn update_availability(
        id: VolunteerId,
        status: AvailabilityStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE volunteers SET availability_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Record the outcome of an admin verification review
    pub async fn update_verification(
        id: VolunteerId,
        status: VerificationStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE volunteers SET verification_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
