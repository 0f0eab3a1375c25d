//! Repository for the `learning_sessions` table.
//!
//! Sessions are append-only: there is no update or delete here.

use skillstack_core::session::NewLearningSession;
use skillstack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::{ActivityRow, DailyMinutesRow, SessionRow};

/// Column list for learning_sessions queries.
const COLUMNS: &str = "id, user_id, skill_id, subtopic_id, duration_minutes, notes, session_date";

/// Provides append and aggregate queries for learning sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Append a session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewLearningSession,
    ) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO learning_sessions \
                (user_id, skill_id, subtopic_id, duration_minutes, notes, session_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(input.user_id)
            .bind(input.skill_id)
            .bind(input.subtopic_id)
            .bind(input.duration_minutes)
            .bind(&input.notes)
            .bind(input.session_date)
            .fetch_one(pool)
            .await
    }

    /// List every session recorded against a skill id, oldest first.
    pub async fn list_by_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<SessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM learning_sessions
             WHERE skill_id = $1
             ORDER BY session_date ASC, id ASC"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// Total minutes logged against a skill id.
    pub async fn total_minutes_for_skill(pool: &PgPool, skill_id: DbId) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(duration_minutes), 0)::BIGINT
             FROM learning_sessions WHERE skill_id = $1",
        )
        .bind(skill_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Total minutes per skill id, for the given ids.
    pub async fn minutes_by_skill(
        pool: &PgPool,
        skill_ids: &[DbId],
    ) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, i64)>(
            "SELECT skill_id, SUM(duration_minutes)::BIGINT
             FROM learning_sessions
             WHERE skill_id = ANY($1)
             GROUP BY skill_id",
        )
        .bind(skill_ids)
        .fetch_all(pool)
        .await
    }

    /// The user's most recent sessions with skill name and subtopic title.
    ///
    /// Names are `NULL` when the skill or subtopic no longer exists.
    pub async fn recent_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRow>(
            "SELECT ls.id, ls.user_id, ls.skill_id, ls.subtopic_id, ls.duration_minutes, \
                    ls.notes, ls.session_date, \
                    s.name AS skill_name, st.title AS subtopic_title \
             FROM learning_sessions ls \
             LEFT JOIN skills s ON s.id = ls.skill_id \
             LEFT JOIN subtopics st ON st.id = ls.subtopic_id \
             WHERE ls.user_id = $1 \
             ORDER BY ls.session_date DESC, ls.id DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Minutes per UTC calendar day since `since`, newest day first.
    pub async fn daily_by_user(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<DailyMinutesRow>, sqlx::Error> {
        sqlx::query_as::<_, DailyMinutesRow>(
            "SELECT (session_date AT TIME ZONE 'UTC')::DATE AS date, \
                    SUM(duration_minutes)::BIGINT AS total_minutes, \
                    COUNT(*) AS session_count \
             FROM learning_sessions \
             WHERE user_id = $1 AND session_date >= $2 \
             GROUP BY 1 \
             ORDER BY 1 DESC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
