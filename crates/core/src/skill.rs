//! Skill entity, creation input, and review validation.

use serde::{Deserialize, Serialize};

use crate::allocation::SubtopicInput;
use crate::error::CoreError;
use crate::status::SkillStatus;
use crate::types::{DbId, Timestamp};

/// Lowest accepted post-completion rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted post-completion rating.
pub const MAX_RATING: i32 = 5;

/// Maximum length of a skill name.
pub const MAX_NAME_LENGTH: usize = 200;

/// A learning goal owned by one user.
///
/// `completed_at` is set exactly when `status` is [`SkillStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub resource_type: String,
    pub platform: String,
    /// Assigned once at creation by the oracle; never recomputed.
    pub category: String,
    pub description: String,
    pub target_hours: f64,
    pub status: SkillStatus,
    pub rating: Option<i32>,
    pub course_notes: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Skill {
    /// Set the skill completed at `now`.
    ///
    /// Idempotent: a skill that is already completed keeps its original
    /// `completed_at`. Returns `true` if the skill changed.
    pub fn mark_completed(&mut self, now: Timestamp) -> bool {
        if self.status.is_completed() {
            return false;
        }
        self.status = SkillStatus::Completed;
        self.completed_at = Some(now);
        true
    }

    /// Promote a not-started skill to in-progress. Returns `true` if it changed.
    pub fn start(&mut self) -> bool {
        if self.status != SkillStatus::NotStarted {
            return false;
        }
        self.status = SkillStatus::InProgress;
        true
    }
}

/// DTO for inserting a new skill row. Status always starts `not-started`.
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub user_id: DbId,
    pub name: String,
    pub resource_type: String,
    pub platform: String,
    pub category: String,
    pub description: String,
    pub target_hours: f64,
}

/// Caller input for creating a skill.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub resource_type: String,
    pub platform: String,
    #[serde(default)]
    pub target_hours: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_subtopics: Vec<SubtopicInput>,
}

impl CreateSkillRequest {
    /// Validate required fields and the hours target.
    pub fn validate(&self) -> Result<(), CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Skill name must not be empty".into()));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Skill name exceeds maximum length of {MAX_NAME_LENGTH} characters"
            )));
        }
        if self.resource_type.trim().is_empty() {
            return Err(CoreError::Validation("Resource type must not be empty".into()));
        }
        if self.platform.trim().is_empty() {
            return Err(CoreError::Validation("Platform must not be empty".into()));
        }
        let target = self.target_hours();
        if !target.is_finite() || target < 0.0 {
            return Err(CoreError::Validation(format!(
                "Target hours must be a non-negative number, got {target}"
            )));
        }
        Ok(())
    }

    /// Planned total hours; absent means zero.
    pub fn target_hours(&self) -> f64 {
        self.target_hours.unwrap_or(0.0)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Post-completion rating and notes.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillReview {
    pub rating: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SkillReview {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CoreError::Validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}, got {}",
                self.rating
            )));
        }
        Ok(())
    }
}
