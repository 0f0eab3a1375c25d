//! Learning session records and input coercion.
//!
//! Sessions are append-only. They are the only source of truth for
//! learned-hours aggregates and outlive the skill they reference.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length for session notes, in characters.
pub const MAX_NOTES_LENGTH: usize = 10_000;

/// An immutable time-logged entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningSession {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_id: DbId,
    pub subtopic_id: Option<DbId>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub session_date: Timestamp,
}

/// DTO for appending a session row.
#[derive(Debug, Clone)]
pub struct NewLearningSession {
    pub user_id: DbId,
    pub skill_id: DbId,
    pub subtopic_id: Option<DbId>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub session_date: Timestamp,
}

/// Caller input for logging a session.
///
/// `duration_minutes` and `session_date` stay loosely typed so they can be
/// coerced with [`parse_duration_minutes`] and [`parse_session_date`].
#[derive(Debug, Clone, Deserialize)]
pub struct LogSessionRequest {
    pub skill_id: DbId,
    #[serde(default)]
    pub subtopic_id: Option<DbId>,
    pub duration_minutes: Value,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub session_date: Option<String>,
}

/// A recent session joined with the names of what it targeted.
///
/// Names are `None` once the skill or subtopic has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionActivity {
    #[serde(flatten)]
    pub session: LearningSession,
    pub skill_name: Option<String>,
    pub subtopic_title: Option<String>,
}

/// Minutes logged on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMinutes {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
}

/// Coerce a duration to a positive whole number of minutes.
///
/// Accepts an integer, a float (truncated toward zero), or a numeric
/// string. Anything else, a non-positive result, or a value too large for
/// the `INTEGER` column is a validation error.
pub fn parse_duration_minutes(value: &Value) -> Result<i32, CoreError> {
    let minutes = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match minutes {
        Some(m) if m > 0 => i32::try_from(m).map_err(|_| {
            CoreError::Validation(format!(
                "Session duration must not exceed {} minutes",
                i32::MAX
            ))
        }),
        _ => Err(CoreError::Validation("Invalid session duration".into())),
    }
}

/// Resolve the session timestamp, defaulting to `now`.
///
/// Accepts RFC 3339, a naive date-time (`T` or space separated, optional
/// fractional seconds, read as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_session_date(raw: Option<&str>, now: Timestamp) -> Result<Timestamp, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(now);
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(CoreError::Validation(format!(
        "Invalid session date '{raw}'. Expected RFC 3339 or YYYY-MM-DD"
    )))
}

/// Validate optional notes length.
pub fn validate_notes(notes: Option<&str>) -> Result<(), CoreError> {
    if let Some(n) = notes {
        if n.chars().count() > MAX_NOTES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Session notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
