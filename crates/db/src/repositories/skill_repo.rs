//! Repository for the `skills` table.
//!
//! A skill owns its subtopics and certificates, so the multi-row units of
//! work (create with subtopics, complete with certificate, delete) each run
//! in a single transaction here.

use skillstack_core::allocation::PlannedSubtopic;
use skillstack_core::skill::{NewSkill, SkillReview};
use skillstack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::certificate::CertificateRow;
use crate::models::skill::SkillRow;
use crate::models::subtopic::SubtopicRow;
use crate::repositories::{CertificateRepo, SubtopicRepo};

/// Column list for skills queries.
const COLUMNS: &str = "id, user_id, name, resource_type, platform, category, description, \
                       target_hours, status, rating, course_notes, created_at, completed_at";

/// Provides storage for skills and their aggregate units of work.
pub struct SkillRepo;

impl SkillRepo {
    /// Insert a skill and its planned subtopics atomically.
    pub async fn create_with_subtopics(
        pool: &PgPool,
        input: &NewSkill,
        planned: &[PlannedSubtopic],
    ) -> Result<(SkillRow, Vec<SubtopicRow>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO skills \
                (user_id, name, resource_type, platform, category, description, target_hours) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let skill = sqlx::query_as::<_, SkillRow>(&insert_query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.resource_type)
            .bind(&input.platform)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.target_hours)
            .fetch_one(&mut *tx)
            .await?;

        let subtopics = SubtopicRepo::insert_planned_inner(&mut tx, skill.id, planned).await?;

        tx.commit().await?;
        Ok((skill, subtopics))
    }

    /// Find a skill by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SkillRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, SkillRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a skill by its ID, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<SkillRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, SkillRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's skills, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<SkillRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SkillRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Move a `not-started` skill to `in-progress`.
    ///
    /// Returns `None` if the skill is missing or already past `not-started`.
    pub async fn start(pool: &PgPool, id: DbId) -> Result<Option<SkillRow>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET status = 'in-progress'
             WHERE id = $1 AND status = 'not-started'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SkillRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Complete a skill and issue its certificate atomically.
    ///
    /// The conditional update only matches a skill that is not completed yet,
    /// so a skill completes at most once. The unique (user_id, skill_id)
    /// constraint on `certificates` backs this up. Returns `None` if nothing
    /// matched.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<(SkillRow, CertificateRow)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE skills SET status = 'completed', completed_at = $2 \
             WHERE id = $1 AND status <> 'completed' \
             RETURNING {COLUMNS}"
        );
        let Some(skill) = sqlx::query_as::<_, SkillRow>(&update_query)
            .bind(id)
            .bind(completed_at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let certificate =
            CertificateRepo::insert_inner(&mut tx, skill.user_id, skill.id, completed_at).await?;

        tx.commit().await?;
        Ok(Some((skill, certificate)))
    }

    /// Store the post-completion rating and notes.
    pub async fn save_review(
        pool: &PgPool,
        id: DbId,
        review: &SkillReview,
    ) -> Result<Option<SkillRow>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET rating = $2, course_notes = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SkillRow>(&query)
            .bind(id)
            .bind(review.rating)
            .bind(&review.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a skill with its subtopics and certificates.
    ///
    /// Learning sessions are left in place. Returns `true` if the skill row
    /// was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        SubtopicRepo::delete_by_skill_inner(&mut tx, id).await?;
        CertificateRepo::delete_by_skill_inner(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
