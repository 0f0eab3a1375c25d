//! Subtopic model.

use skillstack_core::error::CoreError;
use skillstack_core::subtopic::Subtopic;
use skillstack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::{corrupt_row, finite_or_zero};

/// A row from the `subtopics` table.
#[derive(Debug, Clone, FromRow)]
pub struct SubtopicRow {
    pub id: DbId,
    pub skill_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub hours_spent: f64,
    pub expected_hours: f64,
    pub difficulty: String,
    pub notes: Option<String>,
    pub order_index: i32,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<SubtopicRow> for Subtopic {
    type Error = CoreError;

    fn try_from(row: SubtopicRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt_row("subtopics", "status", e))?;
        Ok(Subtopic {
            id: row.id,
            skill_id: row.skill_id,
            title: row.title,
            description: row.description,
            status,
            hours_spent: finite_or_zero(row.hours_spent),
            expected_hours: finite_or_zero(row.expected_hours),
            difficulty: row.difficulty,
            notes: row.notes,
            order_index: row.order_index,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}
