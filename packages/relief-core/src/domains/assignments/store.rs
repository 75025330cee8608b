//! Postgres adapter for the assignment ledger

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::error::LedgerError;
use super::models::{Assignment, AssignmentStatus};
use crate::common::{AssignmentId, RequestId, VolunteerId};
use crate::kernel::BaseAssignmentStore;

pub struct PostgresAssignmentStore {
    pool: PgPool,
}

impl PostgresAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAssignmentStore for PostgresAssignmentStore {
    #[instrument(skip_all, fields(request_id = %assignment.request_id, volunteer_id = %assignment.volunteer_id))]
    async fn insert_and_increment(
        &self,
        assignment: &Assignment,
    ) -> Result<(Assignment, i32), LedgerError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the request serializes concurrent creations for it
        let assigned: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE requests
            SET volunteers_assigned = volunteers_assigned + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING volunteers_assigned
            "#,
        )
        .bind(assignment.request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(assigned) = assigned else {
            tx.rollback().await?;
            return Err(LedgerError::RequestNotFound(assignment.request_id));
        };

        let stored = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (
                id, request_id, volunteer_id, status,
                accepted_at, started_at, completed_at, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.request_id)
        .bind(assignment.volunteer_id)
        .bind(assignment.status)
        .bind(assignment.accepted_at)
        .bind(assignment.started_at)
        .bind(assignment.completed_at)
        .bind(&assignment.notes)
        .bind(assignment.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                LedgerError::VolunteerNotFound(assignment.volunteer_id)
            }
            other => LedgerError::Database(other),
        });

        // Dropping the transaction on error rolls the increment back
        let stored = stored?;
        tx.commit().await?;

        Ok((stored, assigned))
    }

    async fn find_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, LedgerError> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip_all, fields(assignment_id = %assignment.id, status = %assignment.status))]
    async fn save_status(
        &self,
        assignment: &Assignment,
        expected: Option<AssignmentStatus>,
    ) -> Result<Option<Assignment>, LedgerError> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET status = $2,
                accepted_at = $3,
                started_at = $4,
                completed_at = $5,
                updated_at = NOW()
            WHERE id = $1
              AND ($6::assignment_status IS NULL OR status = $6)
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.status)
        .bind(assignment.accepted_at)
        .bind(assignment.started_at)
        .bind(assignment.completed_at)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Vec<Assignment>, LedgerError> {
        sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE request_id = $1 ORDER BY created_at DESC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<Assignment>, LedgerError> {
        sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE volunteer_id = $1 ORDER BY created_at DESC",
        )
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_active(&self) -> Result<Vec<Assignment>, LedgerError> {
        sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments
             WHERE status IN ('accepted', 'in_progress')
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }
}
