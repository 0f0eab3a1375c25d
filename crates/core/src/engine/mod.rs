//! Skill progress engine.
//!
//! Orchestrates skill creation, the subtopic ledger, session recording,
//! completion detection, and certificate issuance on top of a [`Store`].
//!
//! Write flow is one-directional: session -> subtopic -> skill -> certificate.
//! Reads recompute aggregates from stored rows on demand.
//!
//! - [`ledger`] -- subtopic status transitions and time accumulation.
//! - [`recorder`] -- learning session logging.
//! - [`certificates`] -- completion and certificate issuance.
//! - [`dashboard`] -- per-user aggregate view.

pub mod certificates;
pub mod dashboard;
pub mod ledger;
pub mod recorder;

use std::sync::Arc;

use serde::Serialize;

use crate::aggregation::{SkillDetail, SkillSummary};
use crate::allocation::plan_subtopics;
use crate::error::CoreError;
use crate::oracle::SkillOracle;
use crate::skill::{CreateSkillRequest, NewSkill, Skill, SkillReview};
use crate::store::Store;
use crate::types::DbId;

/// Default number of recent sessions summarized on the dashboard.
pub const DEFAULT_RECENT_SESSIONS: i64 = 10;

/// Default calendar window, in days.
pub const DEFAULT_CALENDAR_DAYS: i64 = 30;

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many recent sessions feed the dashboard stats.
    pub recent_sessions_limit: i64,
    /// Length of the dashboard activity calendar.
    pub calendar_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_sessions_limit: DEFAULT_RECENT_SESSIONS,
            calendar_days: DEFAULT_CALENDAR_DAYS,
        }
    }
}

/// Result of creating a skill.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedSkill {
    pub skill_id: DbId,
    pub category: String,
    pub subtopics_created: usize,
}

/// The orchestrator. Cheap to share behind an `Arc`.
pub struct SkillProgressEngine {
    store: Arc<dyn Store>,
    oracle: Arc<dyn SkillOracle>,
    config: EngineConfig,
}

impl SkillProgressEngine {
    pub fn new(store: Arc<dyn Store>, oracle: Arc<dyn SkillOracle>, config: EngineConfig) -> Self {
        Self {
            store,
            oracle,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a skill with its full subtopic plan.
    ///
    /// The category is assigned once here. The skill row and every subtopic
    /// are written as one unit; on failure nothing is persisted.
    pub async fn create_skill(
        &self,
        user_id: DbId,
        request: CreateSkillRequest,
    ) -> Result<CreatedSkill, CoreError> {
        request.validate()?;

        let name = request.name.trim().to_string();
        let description = request.description().trim().to_string();
        let category = self.oracle.categorize(&name, &description);
        let suggestions = self.oracle.suggest_subtopics(&name, &category);
        let plan = plan_subtopics(request.target_hours(), &request.user_subtopics, suggestions);

        let new_skill = NewSkill {
            user_id,
            name,
            resource_type: request.resource_type.trim().to_string(),
            platform: request.platform.trim().to_string(),
            category,
            description,
            target_hours: request.target_hours(),
        };

        let (skill, subtopics) = self
            .store
            .create_skill_with_subtopics(&new_skill, &plan)
            .await
            .map_err(|e| {
                tracing::error!(user_id, error = %e, "Failed to create skill");
                e
            })?;

        tracing::info!(
            user_id,
            skill_id = skill.id,
            category = %skill.category,
            subtopics = subtopics.len(),
            "Skill created"
        );

        Ok(CreatedSkill {
            skill_id: skill.id,
            category: skill.category,
            subtopics_created: subtopics.len(),
        })
    }

    /// Every skill of the user with derived progress, newest first.
    pub async fn list_skills(&self, user_id: DbId) -> Result<Vec<SkillSummary>, CoreError> {
        let skills = self.store.list_skills_for_user(user_id).await?;
        let ids: Vec<DbId> = skills.iter().map(|s| s.id).collect();
        let minutes = self.store.minutes_by_skill(&ids).await?;

        let mut summaries = Vec::with_capacity(skills.len());
        for skill in skills {
            let subtopics = self.store.list_subtopics_for_skill(skill.id).await?;
            let total_minutes = minutes.get(&skill.id).copied().unwrap_or(0);
            summaries.push(SkillSummary::new(skill, &subtopics, total_minutes));
        }
        Ok(summaries)
    }

    /// Skill with ordered subtopics, progress, and learned hours.
    pub async fn skill_detail(&self, user_id: DbId, skill_id: DbId) -> Result<SkillDetail, CoreError> {
        let skill = self.owned_skill(user_id, skill_id).await?;
        let subtopics = self.store.list_subtopics_for_skill(skill_id).await?;
        let total_minutes = self.store.total_minutes_for_skill(skill_id).await?;
        Ok(SkillDetail::new(skill, &subtopics, total_minutes))
    }

    /// Record the post-completion rating and notes.
    pub async fn submit_review(
        &self,
        user_id: DbId,
        skill_id: DbId,
        review: SkillReview,
    ) -> Result<Skill, CoreError> {
        review.validate()?;
        let skill = self.owned_skill(user_id, skill_id).await?;
        if !skill.status.is_completed() {
            return Err(CoreError::Validation(
                "A review can only be submitted once the skill is completed".into(),
            ));
        }

        let updated = self
            .store
            .save_review(skill_id, &review)
            .await?
            .ok_or_else(|| CoreError::not_found("Skill", skill_id))?;
        tracing::info!(user_id, skill_id, rating = review.rating, "Skill review saved");
        Ok(updated)
    }

    /// Delete a skill with its subtopics and certificates.
    ///
    /// Learning sessions that reference the skill are kept for history.
    pub async fn delete_skill(&self, user_id: DbId, skill_id: DbId) -> Result<(), CoreError> {
        self.owned_skill(user_id, skill_id).await?;
        if !self.store.delete_skill(skill_id).await? {
            return Err(CoreError::not_found("Skill", skill_id));
        }
        tracing::info!(user_id, skill_id, "Skill deleted");
        Ok(())
    }

    /// Load a skill the user owns. Missing and foreign skills are both `NotFound`.
    async fn owned_skill(&self, user_id: DbId, skill_id: DbId) -> Result<Skill, CoreError> {
        self.store
            .find_skill_for_user(skill_id, user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Skill", skill_id))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::allocation::SubtopicInput;
    use crate::memory::MemoryStore;
    use crate::oracle::KeywordOracle;
    use crate::skill::CreateSkillRequest;

    use super::{EngineConfig, SkillProgressEngine};

    pub fn engine_with(config: EngineConfig) -> (SkillProgressEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = SkillProgressEngine::new(store.clone(), Arc::new(KeywordOracle), config);
        (engine, store)
    }

    pub fn engine() -> (SkillProgressEngine, Arc<MemoryStore>) {
        engine_with(EngineConfig::default())
    }

    pub fn request(name: &str, target_hours: f64, topics: &[&str]) -> CreateSkillRequest {
        CreateSkillRequest {
            name: name.to_string(),
            resource_type: "course".to_string(),
            platform: "online".to_string(),
            target_hours: Some(target_hours),
            description: None,
            user_subtopics: topics
                .iter()
                .map(|t| SubtopicInput {
                    title: Some((*t).to_string()),
                    description: None,
                })
                .collect(),
        }
    }
}
