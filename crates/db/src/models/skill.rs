//! Skill model.

use skillstack_core::error::CoreError;
use skillstack_core::skill::Skill;
use skillstack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::{corrupt_row, finite_or_zero};

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow)]
pub struct SkillRow {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub resource_type: String,
    pub platform: String,
    pub category: String,
    pub description: String,
    pub target_hours: f64,
    pub status: String,
    pub rating: Option<i32>,
    pub course_notes: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<SkillRow> for Skill {
    type Error = CoreError;

    fn try_from(row: SkillRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt_row("skills", "status", e))?;
        Ok(Skill {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            resource_type: row.resource_type,
            platform: row.platform,
            category: row.category,
            description: row.description,
            target_hours: finite_or_zero(row.target_hours),
            status,
            rating: row.rating,
            course_notes: row.course_notes,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}
