//! Learning session model and aggregate rows.

use chrono::NaiveDate;
use skillstack_core::session::{DailyMinutes, LearningSession, SessionActivity};
use skillstack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `learning_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_id: DbId,
    pub subtopic_id: Option<DbId>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub session_date: Timestamp,
}

impl From<SessionRow> for LearningSession {
    fn from(row: SessionRow) -> Self {
        LearningSession {
            id: row.id,
            user_id: row.user_id,
            skill_id: row.skill_id,
            subtopic_id: row.subtopic_id,
            duration_minutes: row.duration_minutes,
            notes: row.notes,
            session_date: row.session_date,
        }
    }
}

/// A session joined with its skill name and subtopic title.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    #[sqlx(flatten)]
    pub session: SessionRow,
    pub skill_name: Option<String>,
    pub subtopic_title: Option<String>,
}

impl From<ActivityRow> for SessionActivity {
    fn from(row: ActivityRow) -> Self {
        SessionActivity {
            session: row.session.into(),
            skill_name: row.skill_name,
            subtopic_title: row.subtopic_title,
        }
    }
}

/// Minutes grouped by calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyMinutesRow {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
}

impl From<DailyMinutesRow> for DailyMinutes {
    fn from(row: DailyMinutesRow) -> Self {
        DailyMinutes {
            date: row.date,
            total_minutes: row.total_minutes,
            session_count: row.session_count,
        }
    }
}
