//! [`PgStore`]: the PostgreSQL implementation of the core repository traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use skillstack_core::allocation::PlannedSubtopic;
use skillstack_core::certificate::Certificate;
use skillstack_core::error::CoreError;
use skillstack_core::session::{DailyMinutes, LearningSession, NewLearningSession, SessionActivity};
use skillstack_core::skill::{NewSkill, Skill, SkillReview};
use skillstack_core::store::{
    CertificateRepository, Completion, SessionRepository, SkillRepository, Store,
    SubtopicRepository, UserRepository,
};
use skillstack_core::subtopic::Subtopic;
use skillstack_core::types::{DbId, Timestamp};
use skillstack_core::user::{NewUser, User};

use crate::repositories::{CertificateRepo, SessionRepo, SkillRepo, SubtopicRepo, UserRepo};
use crate::DbPool;

/// Repository traits backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error into the core error space.
///
/// Unique constraint violations (PostgreSQL code 23505) become `Conflict`;
/// everything else is a `Persistence` failure.
fn db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Persistence(err.to_string())
}

fn map_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, CoreError>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, CoreError> {
        let row = UserRepo::create(&self.pool, input).await.map_err(db_error)?;
        Ok(row.into())
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_id(&self.pool, id).await.map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(db_error)?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl SkillRepository for PgStore {
    async fn create_skill_with_subtopics(
        &self,
        skill: &NewSkill,
        subtopics: &[PlannedSubtopic],
    ) -> Result<(Skill, Vec<Subtopic>), CoreError> {
        let (skill, subtopics) = SkillRepo::create_with_subtopics(&self.pool, skill, subtopics)
            .await
            .map_err(db_error)?;
        Ok((Skill::try_from(skill)?, map_all(subtopics)?))
    }

    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError> {
        SkillRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Skill::try_from)
            .transpose()
    }

    async fn find_skill_for_user(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Skill>, CoreError> {
        SkillRepo::find_for_user(&self.pool, id, user_id)
            .await
            .map_err(db_error)?
            .map(Skill::try_from)
            .transpose()
    }

    async fn list_skills_for_user(&self, user_id: DbId) -> Result<Vec<Skill>, CoreError> {
        let rows = SkillRepo::list_by_user(&self.pool, user_id)
            .await
            .map_err(db_error)?;
        map_all(rows)
    }

    async fn start_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError> {
        SkillRepo::start(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Skill::try_from)
            .transpose()
    }

    async fn complete_skill(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<Completion>, CoreError> {
        let Some((skill, certificate)) = SkillRepo::complete(&self.pool, id, completed_at)
            .await
            .map_err(db_error)?
        else {
            return Ok(None);
        };
        Ok(Some(Completion {
            skill: Skill::try_from(skill)?,
            certificate: Certificate::from(certificate),
        }))
    }

    async fn save_review(
        &self,
        id: DbId,
        review: &SkillReview,
    ) -> Result<Option<Skill>, CoreError> {
        SkillRepo::save_review(&self.pool, id, review)
            .await
            .map_err(db_error)?
            .map(Skill::try_from)
            .transpose()
    }

    async fn delete_skill(&self, id: DbId) -> Result<bool, CoreError> {
        SkillRepo::delete(&self.pool, id).await.map_err(db_error)
    }
}

#[async_trait]
impl SubtopicRepository for PgStore {
    async fn find_subtopic(&self, id: DbId) -> Result<Option<Subtopic>, CoreError> {
        SubtopicRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Subtopic::try_from)
            .transpose()
    }

    async fn list_subtopics_for_skill(&self, skill_id: DbId) -> Result<Vec<Subtopic>, CoreError> {
        let rows = SubtopicRepo::list_by_skill(&self.pool, skill_id)
            .await
            .map_err(db_error)?;
        map_all(rows)
    }

    async fn save_subtopic_status(&self, subtopic: &Subtopic) -> Result<Subtopic, CoreError> {
        SubtopicRepo::update_status(&self.pool, subtopic)
            .await
            .map_err(db_error)?
            .ok_or_else(|| CoreError::not_found("Subtopic", subtopic.id))
            .and_then(Subtopic::try_from)
    }

    async fn add_subtopic_minutes(
        &self,
        id: DbId,
        minutes: i64,
    ) -> Result<Option<Subtopic>, CoreError> {
        SubtopicRepo::add_minutes(&self.pool, id, minutes)
            .await
            .map_err(db_error)?
            .map(Subtopic::try_from)
            .transpose()
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn create_session(
        &self,
        input: &NewLearningSession,
    ) -> Result<LearningSession, CoreError> {
        let row = SessionRepo::create(&self.pool, input).await.map_err(db_error)?;
        Ok(row.into())
    }

    async fn list_sessions_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<LearningSession>, CoreError> {
        let rows = SessionRepo::list_by_skill(&self.pool, skill_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(LearningSession::from).collect())
    }

    async fn total_minutes_for_skill(&self, skill_id: DbId) -> Result<i64, CoreError> {
        SessionRepo::total_minutes_for_skill(&self.pool, skill_id)
            .await
            .map_err(db_error)
    }

    async fn minutes_by_skill(
        &self,
        skill_ids: &[DbId],
    ) -> Result<BTreeMap<DbId, i64>, CoreError> {
        if skill_ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let rows = SessionRepo::minutes_by_skill(&self.pool, skill_ids)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().collect())
    }

    async fn recent_sessions_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<SessionActivity>, CoreError> {
        let rows = SessionRepo::recent_by_user(&self.pool, user_id, limit)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(SessionActivity::from).collect())
    }

    async fn daily_minutes_for_user(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<DailyMinutes>, CoreError> {
        let rows = SessionRepo::daily_by_user(&self.pool, user_id, since)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(DailyMinutes::from).collect())
    }
}

#[async_trait]
impl CertificateRepository for PgStore {
    async fn list_certificates_for_user(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Certificate>, CoreError> {
        let rows = CertificateRepo::list_by_user(&self.pool, user_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Certificate::from).collect())
    }

    async fn list_certificates_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<Certificate>, CoreError> {
        let rows = CertificateRepo::list_by_skill(&self.pool, skill_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Certificate::from).collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(db_error)
    }
}
