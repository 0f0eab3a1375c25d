//! Skill completion and certificate issuance.

use chrono::Utc;

use crate::certificate::Certificate;
use crate::error::CoreError;
use crate::skill::Skill;
use crate::store::Completion;
use crate::subtopic::all_completed;
use crate::types::DbId;

use super::SkillProgressEngine;

impl SkillProgressEngine {
    /// Mark a skill completed.
    ///
    /// Idempotent: a skill that is already completed is returned untouched
    /// and `completed_at` does not move.
    pub async fn mark_completed(&self, skill_id: DbId) -> Result<Skill, CoreError> {
        if let Some(completion) = self.complete(skill_id).await? {
            return Ok(completion.skill);
        }
        self.store
            .find_skill(skill_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Skill", skill_id))
    }

    /// Complete the skill if every subtopic is completed and it is not
    /// completed already.
    ///
    /// The check is re-derived from stored subtopics on every call. Returns
    /// `None` when nothing changed.
    pub(crate) async fn complete_if_finished(
        &self,
        skill_id: DbId,
    ) -> Result<Option<Completion>, CoreError> {
        let subtopics = self.store.list_subtopics_for_skill(skill_id).await?;
        if !all_completed(&subtopics) {
            return Ok(None);
        }
        match self.store.find_skill(skill_id).await? {
            Some(skill) if !skill.status.is_completed() => self.complete(skill_id).await,
            _ => Ok(None),
        }
    }

    /// Certificates earned by the user, newest first.
    pub async fn list_certificates(&self, user_id: DbId) -> Result<Vec<Certificate>, CoreError> {
        self.store.list_certificates_for_user(user_id).await
    }

    async fn complete(&self, skill_id: DbId) -> Result<Option<Completion>, CoreError> {
        let completion = self
            .store
            .complete_skill(skill_id, Utc::now())
            .await?;

        if let Some(completion) = &completion {
            tracing::info!(
                skill_id,
                user_id = completion.skill.user_id,
                certificate_id = completion.certificate.id,
                "Skill completed, certificate issued"
            );
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::engine::test_support::{engine, request};
    use crate::error::CoreError;
    use crate::status::{SkillStatus, SubtopicStatus};
    use crate::session::LogSessionRequest;
    use crate::store::{CertificateRepository, SubtopicRepository};

    #[tokio::test]
    async fn mark_completed_is_idempotent() {
        let (engine, _store) = engine();
        let created = engine.create_skill(1, request("Figma", 6.0, &[])).await.unwrap();

        let first = engine.mark_completed(created.skill_id).await.unwrap();
        assert_eq!(first.status, SkillStatus::Completed);
        let completed_at = first.completed_at;
        assert!(completed_at.is_some());

        let second = engine.mark_completed(created.skill_id).await.unwrap();
        assert_eq!(second.status, SkillStatus::Completed);
        assert_eq!(second.completed_at, completed_at);

        assert_eq!(engine.list_certificates(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mark_completed_unknown_skill() {
        let (engine, _store) = engine();
        assert_matches!(
            engine.mark_completed(404).await,
            Err(CoreError::NotFound { entity: "Skill", .. })
        );
    }

    #[tokio::test]
    async fn nothing_happens_until_all_subtopics_done() {
        let (engine, store) = engine();
        let created = engine.create_skill(1, request("Figma", 6.0, &[])).await.unwrap();
        let subtopics = store.list_subtopics_for_skill(created.skill_id).await.unwrap();

        engine.add_time(subtopics[0].id, 20).await.unwrap();
        engine
            .set_subtopic_status(1, subtopics[0].id, SubtopicStatus::Completed)
            .await
            .unwrap();

        assert!(engine
            .complete_if_finished(created.skill_id)
            .await
            .unwrap()
            .is_none());
        assert!(engine.list_certificates(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn certificate_goes_to_skill_owner() {
        let (engine, store) = engine();
        let created = engine.create_skill(7, request("Figma", 6.0, &[])).await.unwrap();
        engine.mark_completed(created.skill_id).await.unwrap();

        let certificates = store.list_certificates_for_user(7).await.unwrap();
        assert_eq!(certificates.len(), 1);
        assert_eq!(certificates[0].skill_id, created.skill_id);
    }

    #[tokio::test]
    async fn repeated_completion_triggers_issue_one_certificate() {
        let (engine, store) = engine();
        let created = engine.create_skill(1, request("Figma", 6.0, &[])).await.unwrap();
        let subtopics = store.list_subtopics_for_skill(created.skill_id).await.unwrap();

        let mut issued = 0;
        for st in &subtopics {
            engine.add_time(st.id, 30).await.unwrap();
            let change = engine
                .set_subtopic_status(1, st.id, SubtopicStatus::Completed)
                .await
                .unwrap();
            issued += usize::from(change.certificate.is_some());
        }
        assert_eq!(issued, 1);

        let last = subtopics.last().unwrap();
        let repeat = engine
            .set_subtopic_status(1, last.id, SubtopicStatus::Completed)
            .await
            .unwrap();
        assert!(repeat.certificate.is_none());

        let session = engine
            .add_session(
                1,
                LogSessionRequest {
                    skill_id: created.skill_id,
                    subtopic_id: Some(last.id),
                    duration_minutes: serde_json::json!(15),
                    notes: None,
                    session_date: None,
                },
            )
            .await
            .unwrap();
        assert!(session.certificate.is_none());

        engine.mark_completed(created.skill_id).await.unwrap();

        let certificates = store.list_certificates_for_skill(created.skill_id).await.unwrap();
        assert_eq!(certificates.len(), 1);
    }
}
