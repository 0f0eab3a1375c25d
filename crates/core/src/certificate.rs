//! Completion certificates.
//!
//! A skill completes at most once, so each (user, skill) pair holds at most
//! one certificate. The database enforces this with a unique constraint.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// A record that a user completed every subtopic of a skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certificate {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_id: DbId,
    pub issued_at: Timestamp,
    pub certificate_url: Option<String>,
}
