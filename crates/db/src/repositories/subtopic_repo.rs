//! Repository for the `subtopics` table.

use skillstack_core::allocation::PlannedSubtopic;
use skillstack_core::subtopic::{Subtopic, DEFAULT_DIFFICULTY};
use skillstack_core::types::DbId;
use sqlx::PgPool;

use crate::models::subtopic::SubtopicRow;

/// Column list for subtopics queries.
const COLUMNS: &str = "id, skill_id, title, description, status, hours_spent, expected_hours, \
                       difficulty, notes, order_index, started_at, completed_at";

/// Provides ledger storage for subtopics.
pub struct SubtopicRepo;

impl SubtopicRepo {
    /// Find a subtopic by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubtopicRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subtopics WHERE id = $1");
        sqlx::query_as::<_, SubtopicRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the subtopics of a skill, ordered by position.
    pub async fn list_by_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<SubtopicRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subtopics WHERE skill_id = $1 ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, SubtopicRow>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// Persist the status and lifecycle timestamps of a subtopic.
    pub async fn update_status(
        pool: &PgPool,
        subtopic: &Subtopic,
    ) -> Result<Option<SubtopicRow>, sqlx::Error> {
        let query = format!(
            "UPDATE subtopics SET status = $2, started_at = $3, completed_at = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubtopicRow>(&query)
            .bind(subtopic.id)
            .bind(subtopic.status.as_str())
            .bind(subtopic.started_at)
            .bind(subtopic.completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Add `minutes / 60` to `hours_spent` in a single statement.
    pub async fn add_minutes(
        pool: &PgPool,
        id: DbId,
        minutes: i64,
    ) -> Result<Option<SubtopicRow>, sqlx::Error> {
        let query = format!(
            "UPDATE subtopics SET hours_spent = hours_spent + $2 / 60.0
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubtopicRow>(&query)
            .bind(id)
            .bind(minutes as f64)
            .fetch_optional(pool)
            .await
    }

    /// Insert the planned subtopics of a new skill inside an open transaction.
    pub(crate) async fn insert_planned_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        skill_id: DbId,
        planned: &[PlannedSubtopic],
    ) -> Result<Vec<SubtopicRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO subtopics (skill_id, title, description, expected_hours, difficulty, order_index)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(planned.len());
        for subtopic in planned {
            let row = sqlx::query_as::<_, SubtopicRow>(&query)
                .bind(skill_id)
                .bind(&subtopic.title)
                .bind(&subtopic.description)
                .bind(subtopic.expected_hours)
                .bind(DEFAULT_DIFFICULTY)
                .bind(subtopic.order_index)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Delete every subtopic of a skill inside an open transaction.
    pub(crate) async fn delete_by_skill_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        skill_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtopics WHERE skill_id = $1")
            .bind(skill_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
