//! Subtopic ledger: status transitions and time accumulation.

use chrono::Utc;
use serde::Serialize;

use crate::certificate::Certificate;
use crate::error::CoreError;
use crate::status::{SkillStatus, SubtopicStatus};
use crate::subtopic::{Subtopic, TransitionOutcome};
use crate::types::DbId;

use super::SkillProgressEngine;

/// Result of a subtopic status request.
#[derive(Debug, Clone, Serialize)]
pub struct SubtopicStatusChange {
    pub subtopic: Subtopic,
    /// The owning skill's status after any promotion or completion.
    pub skill_status: SkillStatus,
    /// `true` when this request completed the skill.
    pub skill_completed: bool,
    pub certificate: Option<Certificate>,
}

impl SkillProgressEngine {
    /// Move a subtopic to `status` on behalf of the skill's owner.
    ///
    /// A not-started skill is promoted to in-progress by any accepted
    /// transition into `in-progress` or `completed`. Completing the last open
    /// subtopic completes the skill.
    pub async fn set_subtopic_status(
        &self,
        user_id: DbId,
        subtopic_id: DbId,
        status: SubtopicStatus,
    ) -> Result<SubtopicStatusChange, CoreError> {
        let mut subtopic = self
            .store
            .find_subtopic(subtopic_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Subtopic", subtopic_id))?;
        let mut skill = self
            .store
            .find_skill(subtopic.skill_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Skill", subtopic.skill_id))?;
        if skill.user_id != user_id {
            return Err(CoreError::Forbidden(
                "You do not have access to this subtopic".into(),
            ));
        }

        let before = subtopic.clone();
        let outcome = subtopic.apply_status(status, Utc::now())?;
        if subtopic != before {
            subtopic = self.store.save_subtopic_status(&subtopic).await?;
        }
        if outcome == TransitionOutcome::Changed {
            tracing::info!(
                subtopic_id,
                skill_id = skill.id,
                from = %before.status,
                to = %subtopic.status,
                "Subtopic status changed"
            );
        }

        if status != SubtopicStatus::ToLearn && skill.status == SkillStatus::NotStarted {
            if let Some(started) = self.store.start_skill(skill.id).await? {
                tracing::info!(skill_id = skill.id, "Skill started");
                skill = started;
            }
        }

        let mut certificate = None;
        let mut skill_completed = false;
        if status == SubtopicStatus::Completed {
            if let Some(completion) = self.complete_if_finished(skill.id).await? {
                skill = completion.skill;
                certificate = Some(completion.certificate);
                skill_completed = true;
            }
        }

        Ok(SubtopicStatusChange {
            subtopic: subtopic.for_display(),
            skill_status: skill.status,
            skill_completed,
            certificate,
        })
    }

    /// Add `minutes` of logged time to a subtopic's `hours_spent`.
    pub async fn add_time(&self, subtopic_id: DbId, minutes: i64) -> Result<Subtopic, CoreError> {
        if minutes < 0 {
            return Err(CoreError::Validation(
                "Logged minutes must not be negative".into(),
            ));
        }
        let subtopic = self
            .store
            .add_subtopic_minutes(subtopic_id, minutes)
            .await?
            .ok_or_else(|| CoreError::not_found("Subtopic", subtopic_id))?;
        tracing::debug!(subtopic_id, minutes, hours_spent = subtopic.hours_spent, "Time added");
        Ok(subtopic)
    }
}
