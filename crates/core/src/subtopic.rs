//! Subtopic entity and its per-record rules.
//!
//! Status transitions, the completion guard, and time accumulation are pure
//! methods here; persistence and the skill-level cascade live in the engine.

use serde::Serialize;

use crate::allocation::round_to_tenth;
use crate::error::CoreError;
use crate::status::SubtopicStatus;
use crate::types::{DbId, Timestamp};

/// Difficulty assigned to every new subtopic. Informational only.
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Convert logged minutes to fractional hours.
pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

/// An ordered sub-unit of a skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subtopic {
    pub id: DbId,
    pub skill_id: DbId,
    pub title: String,
    pub description: String,
    pub status: SubtopicStatus,
    /// Running total of logged time, in hours.
    pub hours_spent: f64,
    /// Planned share of the skill's target hours, fixed at creation.
    pub expected_hours: f64,
    pub difficulty: String,
    pub notes: Option<String>,
    pub order_index: i32,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// Outcome of applying a status request to a subtopic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status moved forward.
    Changed,
    /// The subtopic was already in the requested status.
    Unchanged,
}

impl Subtopic {
    /// A subtopic with nothing allocated or nothing logged cannot be completed.
    pub fn ensure_completable(&self) -> Result<(), CoreError> {
        if self.expected_hours == 0.0 || self.hours_spent == 0.0 {
            return Err(CoreError::Validation(
                "Cannot mark completed: please log time for this topic first.".into(),
            ));
        }
        Ok(())
    }

    /// Apply a requested status.
    ///
    /// Requests targeting `completed` are checked against the completion
    /// guard regardless of the prior status. Backward moves are rejected.
    /// `started_at` / `completed_at` are set on first entry and never
    /// overwritten.
    pub fn apply_status(
        &mut self,
        next: SubtopicStatus,
        now: Timestamp,
    ) -> Result<TransitionOutcome, CoreError> {
        if next == SubtopicStatus::Completed {
            self.ensure_completable()?;
        }
        self.status.ensure_forward(next)?;

        match next {
            SubtopicStatus::InProgress if self.started_at.is_none() => {
                self.started_at = Some(now);
            }
            SubtopicStatus::Completed if self.completed_at.is_none() => {
                self.completed_at = Some(now);
            }
            _ => {}
        }

        if self.status == next {
            return Ok(TransitionOutcome::Unchanged);
        }
        self.status = next;
        Ok(TransitionOutcome::Changed)
    }

    /// Accumulate logged minutes into `hours_spent`.
    pub fn add_minutes(&mut self, minutes: i64) {
        self.hours_spent += minutes_to_hours(minutes);
    }

    /// Copy with hour fields rounded to one decimal for presentation.
    pub fn for_display(&self) -> Subtopic {
        Subtopic {
            hours_spent: round_to_tenth(self.hours_spent),
            expected_hours: round_to_tenth(self.expected_hours),
            ..self.clone()
        }
    }
}

/// `true` when the list is non-empty and every subtopic is completed.
pub fn all_completed(subtopics: &[Subtopic]) -> bool {
    !subtopics.is_empty() && subtopics.iter().all(|s| s.status.is_completed())
}

/// Number of completed subtopics in the list.
pub fn completed_count(subtopics: &[Subtopic]) -> usize {
    subtopics.iter().filter(|s| s.status.is_completed()).count()
}
