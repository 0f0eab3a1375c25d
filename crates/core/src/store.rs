//! Repository traits the progress engine depends on.
//!
//! The engine never talks to a concrete database. `skillstack-db` implements
//! these traits for PostgreSQL and [`crate::memory::MemoryStore`] implements
//! them in-process.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::allocation::PlannedSubtopic;
use crate::certificate::Certificate;
use crate::error::CoreError;
use crate::session::{DailyMinutes, LearningSession, NewLearningSession, SessionActivity};
use crate::skill::{NewSkill, Skill, SkillReview};
use crate::subtopic::Subtopic;
use crate::types::{DbId, Timestamp};
use crate::user::{NewUser, User};

/// Result of a skill's completion event.
#[derive(Debug, Clone)]
pub struct Completion {
    pub skill: Skill,
    pub certificate: Certificate,
}

/// User account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Duplicate username or email is a `Conflict`.
    async fn create_user(&self, input: &NewUser) -> Result<User, CoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;
}

/// Skill storage. The skill is the aggregate root for its subtopics and
/// certificates, so the multi-row units of work live here.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Insert a skill and all of its subtopics as one atomic unit.
    async fn create_skill_with_subtopics(
        &self,
        skill: &NewSkill,
        subtopics: &[PlannedSubtopic],
    ) -> Result<(Skill, Vec<Subtopic>), CoreError>;

    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError>;

    /// Find a skill only if it belongs to `user_id`.
    async fn find_skill_for_user(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Skill>, CoreError>;

    /// All skills of a user, newest first.
    async fn list_skills_for_user(&self, user_id: DbId) -> Result<Vec<Skill>, CoreError>;

    /// Promote a `not-started` skill to `in-progress`.
    ///
    /// Returns the updated skill, or `None` if the skill was missing or not
    /// in `not-started`.
    async fn start_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError>;

    /// Mark a skill completed and issue its certificate as one atomic unit.
    ///
    /// Returns `None` if the skill was missing or already completed, in which
    /// case nothing is written. The certificate goes to the skill's owner.
    async fn complete_skill(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<Completion>, CoreError>;

    /// Store the post-completion rating and notes.
    async fn save_review(&self, id: DbId, review: &SkillReview)
        -> Result<Option<Skill>, CoreError>;

    /// Delete a skill with its subtopics and certificates as one atomic unit.
    ///
    /// Learning sessions are retained. Returns `false` if nothing was deleted.
    async fn delete_skill(&self, id: DbId) -> Result<bool, CoreError>;
}

/// Subtopic storage.
#[async_trait]
pub trait SubtopicRepository: Send + Sync {
    async fn find_subtopic(&self, id: DbId) -> Result<Option<Subtopic>, CoreError>;

    /// Subtopics of a skill ordered by `order_index`.
    async fn list_subtopics_for_skill(&self, skill_id: DbId) -> Result<Vec<Subtopic>, CoreError>;

    /// Persist `status`, `started_at`, and `completed_at` of a subtopic.
    async fn save_subtopic_status(&self, subtopic: &Subtopic) -> Result<Subtopic, CoreError>;

    /// Atomically add `minutes / 60` to `hours_spent`.
    async fn add_subtopic_minutes(
        &self,
        id: DbId,
        minutes: i64,
    ) -> Result<Option<Subtopic>, CoreError>;
}

/// Append-only learning session storage plus its aggregate queries.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, input: &NewLearningSession)
        -> Result<LearningSession, CoreError>;

    /// Every session recorded against a skill id, oldest first.
    async fn list_sessions_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<LearningSession>, CoreError>;

    /// Sum of minutes across all sessions for a skill id.
    async fn total_minutes_for_skill(&self, skill_id: DbId) -> Result<i64, CoreError>;

    /// Sum of minutes grouped by skill id, for the given ids.
    async fn minutes_by_skill(&self, skill_ids: &[DbId])
        -> Result<BTreeMap<DbId, i64>, CoreError>;

    /// The user's most recent sessions, newest first.
    async fn recent_sessions_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<SessionActivity>, CoreError>;

    /// Minutes per UTC calendar day since `since`, newest day first.
    async fn daily_minutes_for_user(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<DailyMinutes>, CoreError>;
}

/// Certificate reads. Issuance happens inside [`SkillRepository::complete_skill`].
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    async fn list_certificates_for_user(&self, user_id: DbId)
        -> Result<Vec<Certificate>, CoreError>;

    async fn list_certificates_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<Certificate>, CoreError>;
}

/// Every repository the engine needs, behind one handle.
#[async_trait]
pub trait Store:
    UserRepository + SkillRepository + SubtopicRepository + SessionRepository + CertificateRepository
{
    /// Check the backing storage is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;
}
