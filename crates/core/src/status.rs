//! Status state machines for skills and subtopics.
//!
//! Both lifecycles are strictly forward-only. The derived `Ord` follows
//! declaration order, so "forward" means `next >= current`; a request that
//! would move backwards is rejected as a validation error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Skill status
// ---------------------------------------------------------------------------

/// Lifecycle of a skill: `not-started -> in-progress -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl SkillStatus {
    /// All valid skill statuses, in lifecycle order.
    pub const ALL: [SkillStatus; 3] = [
        SkillStatus::NotStarted,
        SkillStatus::InProgress,
        SkillStatus::Completed,
    ];

    /// The wire / storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillStatus::NotStarted => "not-started",
            SkillStatus::InProgress => "in-progress",
            SkillStatus::Completed => "completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == SkillStatus::Completed
    }

    /// Check that moving from `self` to `next` does not go backwards.
    pub fn ensure_forward(self, next: SkillStatus) -> Result<(), CoreError> {
        if next >= self {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Skill status cannot move from '{self}' back to '{next}'"
            )))
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid skill status '{s}'. Must be one of: not-started, in-progress, completed"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Subtopic status
// ---------------------------------------------------------------------------

/// Lifecycle of a subtopic: `to-learn -> in-progress -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtopicStatus {
    ToLearn,
    InProgress,
    Completed,
}

impl SubtopicStatus {
    /// All valid subtopic statuses, in lifecycle order.
    pub const ALL: [SubtopicStatus; 3] = [
        SubtopicStatus::ToLearn,
        SubtopicStatus::InProgress,
        SubtopicStatus::Completed,
    ];

    /// The wire / storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SubtopicStatus::ToLearn => "to-learn",
            SubtopicStatus::InProgress => "in-progress",
            SubtopicStatus::Completed => "completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == SubtopicStatus::Completed
    }

    /// Check that moving from `self` to `next` does not go backwards.
    ///
    /// Same-status requests are accepted (they are no-ops for the caller).
    pub fn ensure_forward(self, next: SubtopicStatus) -> Result<(), CoreError> {
        if next >= self {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Subtopic status cannot move from '{self}' back to '{next}'"
            )))
        }
    }
}

impl fmt::Display for SubtopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubtopicStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubtopicStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid subtopic status '{s}'. Must be one of: to-learn, in-progress, completed"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_status_round_trips_through_str() {
        for status in SkillStatus::ALL {
            assert_eq!(status.as_str().parse::<SkillStatus>().unwrap(), status);
        }
    }

    #[test]
    fn subtopic_status_serializes_kebab_case() {
        let json = serde_json::to_string(&SubtopicStatus::ToLearn).unwrap();
        assert_eq!(json, "\"to-learn\"");
        let parsed: SubtopicStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, SubtopicStatus::InProgress);
    }

    #[test]
    fn unknown_status_is_validation_error() {
        assert!(matches!(
            "done".parse::<SubtopicStatus>(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            "started".parse::<SkillStatus>(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn forward_and_same_transitions_are_allowed() {
        assert!(SubtopicStatus::ToLearn
            .ensure_forward(SubtopicStatus::InProgress)
            .is_ok());
        assert!(SubtopicStatus::ToLearn
            .ensure_forward(SubtopicStatus::Completed)
            .is_ok());
        assert!(SubtopicStatus::InProgress
            .ensure_forward(SubtopicStatus::InProgress)
            .is_ok());
        assert!(SkillStatus::NotStarted
            .ensure_forward(SkillStatus::Completed)
            .is_ok());
    }

    #[test]
    fn backward_transitions_are_rejected() {
        let err = SubtopicStatus::Completed
            .ensure_forward(SubtopicStatus::ToLearn)
            .unwrap_err();
        assert!(err.to_string().contains("cannot move from 'completed'"));

        assert!(SkillStatus::Completed
            .ensure_forward(SkillStatus::NotStarted)
            .is_err());
        assert!(SkillStatus::InProgress
            .ensure_forward(SkillStatus::NotStarted)
            .is_err());
    }
}
