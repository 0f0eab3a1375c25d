//! In-process [`Store`] implementation.
//!
//! Keeps every table in one lock so each trait call is atomic, matching the
//! transactional guarantees of the PostgreSQL store. Used by unit tests and
//! HTTP-level tests that run without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::aggregation;
use crate::allocation::PlannedSubtopic;
use crate::certificate::Certificate;
use crate::error::CoreError;
use crate::session::{DailyMinutes, LearningSession, NewLearningSession, SessionActivity};
use crate::skill::{NewSkill, Skill, SkillReview};
use crate::status::{SkillStatus, SubtopicStatus};
use crate::store::{
    CertificateRepository, Completion, SessionRepository, SkillRepository, Store,
    SubtopicRepository, UserRepository,
};
use crate::subtopic::{minutes_to_hours, Subtopic, DEFAULT_DIFFICULTY};
use crate::types::{DbId, Timestamp};
use crate::user::{NewUser, User};

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    skills: BTreeMap<DbId, Skill>,
    subtopics: BTreeMap<DbId, Subtopic>,
    sessions: Vec<LearningSession>,
    certificates: Vec<Certificate>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`CoreError::Persistence`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("simulated write failure".into()));
        }
        Ok(())
    }

    /// Number of subtopic rows across all skills.
    pub async fn subtopic_count(&self) -> usize {
        self.tables.read().await.subtopics.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == input.username || u.email == input.email)
        {
            return Err(CoreError::Conflict("Username or email already exists".into()));
        }
        let user = User {
            id: tables.next_id(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create_skill_with_subtopics(
        &self,
        input: &NewSkill,
        planned: &[PlannedSubtopic],
    ) -> Result<(Skill, Vec<Subtopic>), CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let skill = Skill {
            id: tables.next_id(),
            user_id: input.user_id,
            name: input.name.clone(),
            resource_type: input.resource_type.clone(),
            platform: input.platform.clone(),
            category: input.category.clone(),
            description: input.description.clone(),
            target_hours: input.target_hours,
            status: SkillStatus::NotStarted,
            rating: None,
            course_notes: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        tables.skills.insert(skill.id, skill.clone());

        let mut subtopics = Vec::with_capacity(planned.len());
        for plan in planned {
            let subtopic = Subtopic {
                id: tables.next_id(),
                skill_id: skill.id,
                title: plan.title.clone(),
                description: plan.description.clone(),
                status: SubtopicStatus::ToLearn,
                hours_spent: 0.0,
                expected_hours: plan.expected_hours,
                difficulty: DEFAULT_DIFFICULTY.to_string(),
                notes: None,
                order_index: plan.order_index,
                started_at: None,
                completed_at: None,
            };
            tables.subtopics.insert(subtopic.id, subtopic.clone());
            subtopics.push(subtopic);
        }

        Ok((skill, subtopics))
    }

    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError> {
        Ok(self.tables.read().await.skills.get(&id).cloned())
    }

    async fn find_skill_for_user(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Skill>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .skills
            .get(&id)
            .filter(|s| s.user_id == user_id)
            .cloned())
    }

    async fn list_skills_for_user(&self, user_id: DbId) -> Result<Vec<Skill>, CoreError> {
        let tables = self.tables.read().await;
        let mut skills: Vec<Skill> = tables
            .skills
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        skills.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(skills)
    }

    async fn start_skill(&self, id: DbId) -> Result<Option<Skill>, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        Ok(tables
            .skills
            .get_mut(&id)
            .filter(|s| s.status == SkillStatus::NotStarted)
            .map(|s| {
                s.start();
                s.clone()
            }))
    }

    async fn complete_skill(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<Completion>, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let Some(skill) = tables.skills.get(&id) else {
            return Ok(None);
        };
        if skill.status.is_completed() {
            return Ok(None);
        }
        let (user_id, skill_id) = (skill.user_id, skill.id);
        if tables
            .certificates
            .iter()
            .any(|c| c.user_id == user_id && c.skill_id == skill_id)
        {
            return Err(CoreError::Conflict(format!(
                "Certificate already exists for skill {skill_id}"
            )));
        }

        let Some(skill) = tables.skills.get_mut(&id) else {
            return Ok(None);
        };
        skill.mark_completed(completed_at);
        let skill = skill.clone();

        let certificate = Certificate {
            id: tables.next_id(),
            user_id: skill.user_id,
            skill_id: skill.id,
            issued_at: completed_at,
            certificate_url: None,
        };
        tables.certificates.push(certificate.clone());

        Ok(Some(Completion { skill, certificate }))
    }

    async fn save_review(
        &self,
        id: DbId,
        review: &SkillReview,
    ) -> Result<Option<Skill>, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        Ok(tables.skills.get_mut(&id).map(|s| {
            s.rating = Some(review.rating);
            s.course_notes = review.notes.clone();
            s.clone()
        }))
    }

    async fn delete_skill(&self, id: DbId) -> Result<bool, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables.skills.remove(&id).is_none() {
            return Ok(false);
        }
        tables.subtopics.retain(|_, st| st.skill_id != id);
        tables.certificates.retain(|c| c.skill_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SubtopicRepository for MemoryStore {
    async fn find_subtopic(&self, id: DbId) -> Result<Option<Subtopic>, CoreError> {
        Ok(self.tables.read().await.subtopics.get(&id).cloned())
    }

    async fn list_subtopics_for_skill(&self, skill_id: DbId) -> Result<Vec<Subtopic>, CoreError> {
        let tables = self.tables.read().await;
        let mut subtopics: Vec<Subtopic> = tables
            .subtopics
            .values()
            .filter(|st| st.skill_id == skill_id)
            .cloned()
            .collect();
        subtopics.sort_by_key(|st| (st.order_index, st.id));
        Ok(subtopics)
    }

    async fn save_subtopic_status(&self, subtopic: &Subtopic) -> Result<Subtopic, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let stored = tables
            .subtopics
            .get_mut(&subtopic.id)
            .ok_or_else(|| CoreError::not_found("Subtopic", subtopic.id))?;
        stored.status = subtopic.status;
        stored.started_at = subtopic.started_at;
        stored.completed_at = subtopic.completed_at;
        Ok(stored.clone())
    }

    async fn add_subtopic_minutes(
        &self,
        id: DbId,
        minutes: i64,
    ) -> Result<Option<Subtopic>, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        Ok(tables.subtopics.get_mut(&id).map(|st| {
            st.hours_spent += minutes_to_hours(minutes);
            st.clone()
        }))
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(
        &self,
        input: &NewLearningSession,
    ) -> Result<LearningSession, CoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let session = LearningSession {
            id: tables.next_id(),
            user_id: input.user_id,
            skill_id: input.skill_id,
            subtopic_id: input.subtopic_id,
            duration_minutes: input.duration_minutes,
            notes: input.notes.clone(),
            session_date: input.session_date,
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn list_sessions_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<LearningSession>, CoreError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<LearningSession> = tables
            .sessions
            .iter()
            .filter(|s| s.skill_id == skill_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.session_date, s.id));
        Ok(sessions)
    }

    async fn total_minutes_for_skill(&self, skill_id: DbId) -> Result<i64, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .filter(|s| s.skill_id == skill_id)
            .map(|s| i64::from(s.duration_minutes))
            .sum())
    }

    async fn minutes_by_skill(
        &self,
        skill_ids: &[DbId],
    ) -> Result<BTreeMap<DbId, i64>, CoreError> {
        let tables = self.tables.read().await;
        Ok(aggregation::minutes_by_skill(
            tables.sessions.iter().filter(|s| skill_ids.contains(&s.skill_id)),
        ))
    }

    async fn recent_sessions_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<SessionActivity>, CoreError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<&LearningSession> = tables
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        sessions.sort_by(|a, b| (b.session_date, b.id).cmp(&(a.session_date, a.id)));

        Ok(sessions
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|s| SessionActivity {
                session: s.clone(),
                skill_name: tables.skills.get(&s.skill_id).map(|sk| sk.name.clone()),
                subtopic_title: s
                    .subtopic_id
                    .and_then(|id| tables.subtopics.get(&id))
                    .map(|st| st.title.clone()),
            })
            .collect())
    }

    async fn daily_minutes_for_user(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<DailyMinutes>, CoreError> {
        let tables = self.tables.read().await;
        Ok(aggregation::daily_minutes(
            tables.sessions.iter().filter(|s| s.user_id == user_id),
            since,
        ))
    }
}

#[async_trait]
impl CertificateRepository for MemoryStore {
    async fn list_certificates_for_user(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Certificate>, CoreError> {
        let tables = self.tables.read().await;
        let mut certificates: Vec<Certificate> = tables
            .certificates
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        certificates.sort_by(|a, b| (b.issued_at, b.id).cmp(&(a.issued_at, a.id)));
        Ok(certificates)
    }

    async fn list_certificates_for_skill(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<Certificate>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .certificates
            .iter()
            .filter(|c| c.skill_id == skill_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
