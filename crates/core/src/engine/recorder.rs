//! Session recorder.

use chrono::Utc;
use serde::Serialize;

use crate::certificate::Certificate;
use crate::error::CoreError;
use crate::session::{
    parse_duration_minutes, parse_session_date, validate_notes, LearningSession,
    LogSessionRequest, NewLearningSession,
};
use crate::status::{SkillStatus, SubtopicStatus};
use crate::subtopic::Subtopic;
use crate::types::DbId;

use super::SkillProgressEngine;

/// Result of logging a session.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedSession {
    pub session: LearningSession,
    /// The targeted subtopic after time was added, if any.
    pub subtopic: Option<Subtopic>,
    pub skill_status: SkillStatus,
    pub certificate: Option<Certificate>,
}

impl SkillProgressEngine {
    /// Append a learning session and feed it into the ledger.
    ///
    /// The skill is looked up by id without an ownership check. A supplied
    /// subtopic must belong to that skill. A `to-learn` subtopic becomes
    /// `in-progress` and a `not-started` skill becomes `in-progress`.
    pub async fn add_session(
        &self,
        user_id: DbId,
        request: LogSessionRequest,
    ) -> Result<RecordedSession, CoreError> {
        let minutes = parse_duration_minutes(&request.duration_minutes)?;
        validate_notes(request.notes.as_deref())?;
        let now = Utc::now();
        let session_date = parse_session_date(request.session_date.as_deref(), now)?;

        let mut skill = self
            .store
            .find_skill(request.skill_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Skill", request.skill_id))?;

        if let Some(subtopic_id) = request.subtopic_id {
            let subtopic = self
                .store
                .find_subtopic(subtopic_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Subtopic", subtopic_id))?;
            if subtopic.skill_id != skill.id {
                return Err(CoreError::Validation(format!(
                    "Subtopic {subtopic_id} does not belong to skill {}",
                    skill.id
                )));
            }
        }

        let notes = request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let session = self
            .store
            .create_session(&NewLearningSession {
                user_id,
                skill_id: skill.id,
                subtopic_id: request.subtopic_id,
                duration_minutes: minutes,
                notes,
                session_date,
            })
            .await?;
        tracing::info!(
            session_id = session.id,
            user_id,
            skill_id = skill.id,
            minutes,
            "Learning session recorded"
        );

        let mut subtopic = None;
        if let Some(subtopic_id) = request.subtopic_id {
            let mut updated = self.add_time(subtopic_id, i64::from(minutes)).await?;
            if updated.status == SubtopicStatus::ToLearn {
                updated.apply_status(SubtopicStatus::InProgress, now)?;
                updated = self.store.save_subtopic_status(&updated).await?;
                tracing::info!(subtopic_id, "Subtopic started by session");
            }
            subtopic = Some(updated.for_display());
        }

        if skill.status == SkillStatus::NotStarted {
            if let Some(started) = self.store.start_skill(skill.id).await? {
                tracing::info!(skill_id = skill.id, "Skill started");
                skill = started;
            }
        }

        let mut certificate = None;
        if let Some(completion) = self.complete_if_finished(skill.id).await? {
            skill = completion.skill;
            certificate = Some(completion.certificate);
        }

        Ok(RecordedSession {
            session,
            subtopic,
            skill_status: skill.status,
            certificate,
        })
    }
}
