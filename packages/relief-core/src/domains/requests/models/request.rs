use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::common::{Coordinate, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "request_urgency", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    /// Lenient parse for labels coming from forms and imports.
    ///
    /// Anything unrecognised is treated as medium urgency.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Urgency::Low,
            "high" => Urgency::High,
            _ => Urgency::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Open,
    Assigned,
    InProgress,
    Resolved,
    Cancelled,
}

/// Help request posted by an organization
///
/// `volunteers_assigned` is the fulfillment count. Only the assignment ledger
/// writes it, one increment per created assignment.
#[derive(FromRow, Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct HelpRequest {
    #[builder(default = RequestId::new())]
    pub id: RequestId,
    #[builder(default = Uuid::nil())]
    pub organization_id: Uuid,
    #[builder(default)]
    pub organization_name: String,
    pub title: String,
    #[builder(default)]
    pub description: String,

    // Location (coarse precision, resolved upstream by geocoding)
    #[builder(default, setter(strip_option))]
    pub latitude: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub longitude: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub location_name: Option<String>,

    #[builder(default)]
    pub skills_needed: Vec<String>,
    #[builder(default)]
    pub urgency: Urgency,
    #[builder(default = 1)]
    pub volunteers_needed: i32,
    #[builder(default = 0)]
    pub volunteers_assigned: i32,
    #[builder(default)]
    pub status: RequestStatus,

    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

/// Optional filters for listing requests (requester dashboards)
#[derive(Debug, Clone, Default)]
pub struct RequestFilters {
    pub status: Option<RequestStatus>,
    pub urgency: Option<Urgency>,
    pub organization_id: Option<Uuid>,
}

impl HelpRequest {
    /// Location when both halves are known
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    /// How many more volunteers the request still asks for
    pub fn open_slots(&self) -> i32 {
        (self.volunteers_needed - self.volunteers_assigned).max(0)
    }

    /// Find request by ID
    pub async fn find_by_id(id: RequestId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// List requests matching the filters, newest first
    pub async fn find_filtered(filters: &RequestFilters, pool: &PgPool) -> Result<Vec<Self>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM requests WHERE TRUE");

        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(urgency) = filters.urgency {
            query.push(" AND urgency = ").push_bind(urgency);
        }
        if let Some(organization_id) = filters.organization_id {
            query.push(" AND organization_id = ").push_bind(organization_id);
        }
        query.push(" ORDER BY created_at DESC");

        query
            .build_query_as::<Self>()
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Open requests, newest first
    pub async fn find_open(pool: &PgPool) -> Result<Vec<Self>> {
        let filters = RequestFilters {
            status: Some(RequestStatus::Open),
            ..RequestFilters::default()
        };
        Self::find_filtered(&filters, pool).await
    }

    /// Insert new request
    ///
    /// The assigned count always starts at zero regardless of the struct value.
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO requests (
                id,
                organization_id,
                organization_name,
                title,
                description,
                latitude,
                longitude,
                location_name,
                skills_needed,
                urgency,
                volunteers_needed,
                volunteers_assigned,
                status,
                created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12, $13)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.organization_id)
        .bind(&self.organization_name)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(&self.location_name)
        .bind(&self.skills_needed)
        .bind(self.urgency)
        .bind(self.volunteers_needed)
        .bind(self.status)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update lifecycle status. Returns `None` if the request does not exist.
    pub async fn update_status(
        id: RequestId,
        status: RequestStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_urgency_labels_fall_back_to_medium() {
        assert_eq!(Urgency::from_label("HIGH"), Urgency::High);
        assert_eq!(Urgency::from_label(" low "), Urgency::Low);
        assert_eq!(Urgency::from_label("medium"), Urgency::Medium);
        assert_eq!(Urgency::from_label("critical"), Urgency::Medium);
        assert_eq!(Urgency::from_label(""), Urgency::Medium);
    }

    #[test]
    fn open_slots_never_negative() {
        let mut request = HelpRequest::builder()
            .title("Sandbag the riverbank")
            .volunteers_needed(3)
            .build();
        assert_eq!(request.open_slots(), 3);

        request.volunteers_assigned = 5;
        assert_eq!(request.open_slots(), 0);
    }

    #[test]
    fn builder_defaults() {
        let request = HelpRequest::builder().title("Water delivery").build();

        assert_eq!(request.status, RequestStatus::Open);
        assert_eq!(request.urgency, Urgency::Medium);
        assert_eq!(request.volunteers_needed, 1);
        assert_eq!(request.volunteers_assigned, 0);
        assert!(request.skills_needed.is_empty());
        assert!(request.coordinate().is_none());
    }
}
