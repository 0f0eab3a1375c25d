//! Read-side aggregation: progress, learned hours, and dashboard figures.
//!
//! Nothing here is cached; every value is recomputed from subtopic state and
//! session rows on each read.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::allocation::round_to_tenth;
use crate::session::{DailyMinutes, LearningSession, SessionActivity};
use crate::skill::Skill;
use crate::subtopic::{completed_count, Subtopic};
use crate::types::{DbId, Timestamp};

/// Completed share of subtopics as a percentage, one decimal.
///
/// Zero when the skill has no subtopics.
pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_tenth(completed as f64 / total as f64 * 100.0)
}

/// Logged minutes converted to hours, one decimal.
pub fn learned_hours(total_minutes: i64) -> f64 {
    round_to_tenth(total_minutes as f64 / 60.0)
}

// ---------------------------------------------------------------------------
// Skill views
// ---------------------------------------------------------------------------

/// A skill with its derived progress figures, as listed on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    #[serde(flatten)]
    pub skill: Skill,
    pub total_subtopics: usize,
    pub completed_subtopics: usize,
    pub progress: f64,
    pub learned_hours: f64,
}

impl SkillSummary {
    pub fn new(skill: Skill, subtopics: &[Subtopic], total_minutes: i64) -> Self {
        let total = subtopics.len();
        let completed = completed_count(subtopics);
        SkillSummary {
            skill,
            total_subtopics: total,
            completed_subtopics: completed,
            progress: progress_percent(completed, total),
            learned_hours: learned_hours(total_minutes),
        }
    }
}

/// Full skill view with ordered subtopics.
#[derive(Debug, Clone, Serialize)]
pub struct SkillDetail {
    #[serde(flatten)]
    pub skill: Skill,
    pub subtopics: Vec<Subtopic>,
    pub progress: f64,
    pub learned_hours: f64,
}

impl SkillDetail {
    /// Build the view; subtopic hours are rounded for display.
    pub fn new(skill: Skill, subtopics: &[Subtopic], total_minutes: i64) -> Self {
        SkillDetail {
            skill,
            progress: progress_percent(completed_count(subtopics), subtopics.len()),
            learned_hours: learned_hours(total_minutes),
            subtopics: subtopics.iter().map(Subtopic::for_display).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Headline dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_skills: usize,
    pub completed_skills: usize,
    /// Minutes across the most recent sessions only.
    pub total_learning_minutes: i64,
    pub total_learning_hours: f64,
    pub average_session_minutes: f64,
    pub completion_rate: f64,
}

impl DashboardStats {
    pub fn compute(skills: &[SkillSummary], recent: &[SessionActivity]) -> Self {
        let total_skills = skills.len();
        let completed_skills = skills
            .iter()
            .filter(|s| s.skill.status.is_completed())
            .count();
        let total_learning_minutes: i64 = recent
            .iter()
            .map(|a| i64::from(a.session.duration_minutes))
            .sum();
        let average_session_minutes = if recent.is_empty() {
            0.0
        } else {
            round_to_tenth(total_learning_minutes as f64 / recent.len() as f64)
        };

        DashboardStats {
            total_skills,
            completed_skills,
            total_learning_minutes,
            total_learning_hours: learned_hours(total_learning_minutes),
            average_session_minutes,
            completion_rate: progress_percent(completed_skills, total_skills),
        }
    }
}

/// One day in the activity calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
    pub total_hours: f64,
}

impl From<DailyMinutes> for CalendarDay {
    fn from(day: DailyMinutes) -> Self {
        CalendarDay {
            date: day.date,
            total_minutes: day.total_minutes,
            session_count: day.session_count,
            total_hours: learned_hours(day.total_minutes),
        }
    }
}

/// Aggregated dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_activities: Vec<SessionActivity>,
    pub skills_progress: Vec<SkillSummary>,
    pub category_breakdown: BTreeMap<String, usize>,
    /// Most recent day first.
    pub calendar_data: Vec<CalendarDay>,
}

/// Count skills per category.
pub fn category_breakdown(skills: &[SkillSummary]) -> BTreeMap<String, usize> {
    let mut breakdown = BTreeMap::new();
    for summary in skills {
        *breakdown.entry(summary.skill.category.clone()).or_insert(0) += 1;
    }
    breakdown
}

/// Start of the calendar window: midnight UTC, `days` days before `now`.
pub fn calendar_window_start(now: Timestamp, days: i64) -> Timestamp {
    let first_day = (now - Duration::days(days)).date_naive();
    first_day
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// Group sessions at or after `since` by UTC calendar date, newest day first.
pub fn daily_minutes<'a, I>(sessions: I, since: Timestamp) -> Vec<DailyMinutes>
where
    I: IntoIterator<Item = &'a LearningSession>,
{
    let mut by_day: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for session in sessions.into_iter().filter(|s| s.session_date >= since) {
        let entry = by_day.entry(session.session_date.date_naive()).or_default();
        entry.0 += i64::from(session.duration_minutes);
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, (total_minutes, session_count))| DailyMinutes {
            date,
            total_minutes,
            session_count,
        })
        .collect()
}

/// Sum minutes per skill id.
pub fn minutes_by_skill<'a, I>(sessions: I) -> BTreeMap<DbId, i64>
where
    I: IntoIterator<Item = &'a LearningSession>,
{
    let mut totals = BTreeMap::new();
    for session in sessions {
        *totals.entry(session.skill_id).or_insert(0) += i64::from(session.duration_minutes);
    }
    totals
}
