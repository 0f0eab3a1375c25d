//! Per-user dashboard.

use crate::aggregation::{
    calendar_window_start, category_breakdown, CalendarDay, Dashboard, DashboardStats,
};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

use super::SkillProgressEngine;

impl SkillProgressEngine {
    /// Build the dashboard as of `now`.
    pub async fn dashboard(&self, user_id: DbId, now: Timestamp) -> Result<Dashboard, CoreError> {
        let skills = self.list_skills(user_id).await?;
        let recent = self
            .store
            .recent_sessions_for_user(user_id, self.config.recent_sessions_limit)
            .await?;
        let since = calendar_window_start(now, self.config.calendar_days);
        let days = self.store.daily_minutes_for_user(user_id, since).await?;

        Ok(Dashboard {
            stats: DashboardStats::compute(&skills, &recent),
            category_breakdown: category_breakdown(&skills),
            recent_activities: recent,
            skills_progress: skills,
            calendar_data: days.into_iter().map(CalendarDay::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::engine::test_support::{engine, engine_with, request};
    use crate::engine::EngineConfig;
    use crate::session::LogSessionRequest;

    fn log_at(skill_id: i64, minutes: i64, date: String) -> LogSessionRequest {
        LogSessionRequest {
            skill_id,
            subtopic_id: None,
            duration_minutes: json!(minutes),
            notes: None,
            session_date: Some(date),
        }
    }

    #[tokio::test]
    async fn completion_rate_with_one_of_two_completed() {
        let (engine, _store) = engine();
        let done = engine.create_skill(1, request("Figma", 6.0, &[])).await.unwrap();
        engine.create_skill(1, request("Rust Programming", 6.0, &[])).await.unwrap();
        engine.mark_completed(done.skill_id).await.unwrap();

        let dashboard = engine.dashboard(1, Utc::now()).await.unwrap();
        assert_eq!(dashboard.stats.total_skills, 2);
        assert_eq!(dashboard.stats.completed_skills, 1);
        assert_eq!(dashboard.stats.completion_rate, 50.0);
        assert_eq!(dashboard.category_breakdown.get("Design"), Some(&1));
        assert_eq!(dashboard.category_breakdown.get("Programming"), Some(&1));
        assert_eq!(dashboard.skills_progress.len(), 2);
    }

    #[tokio::test]
    async fn empty_dashboard() {
        let (engine, _store) = engine();
        let dashboard = engine.dashboard(1, Utc::now()).await.unwrap();
        assert_eq!(dashboard.stats.total_skills, 0);
        assert_eq!(dashboard.stats.completion_rate, 0.0);
        assert!(dashboard.recent_activities.is_empty());
        assert!(dashboard.calendar_data.is_empty());
    }

    #[tokio::test]
    async fn recent_window_and_calendar() {
        let (engine, _store) = engine_with(EngineConfig {
            recent_sessions_limit: 2,
            ..EngineConfig::default()
        });
        let skill = engine.create_skill(1, request("Figma", 6.0, &[])).await.unwrap();
        let now = Utc::now();
        let day = |offset: i64| (now - Duration::days(offset)).to_rfc3339();

        engine.add_session(1, log_at(skill.skill_id, 30, day(1))).await.unwrap();
        engine.add_session(1, log_at(skill.skill_id, 60, day(2))).await.unwrap();
        engine.add_session(1, log_at(skill.skill_id, 90, day(3))).await.unwrap();
        engine.add_session(1, log_at(skill.skill_id, 500, day(45))).await.unwrap();
        // Counts toward the skill's learned hours, not toward user 1's activity.
        engine.add_session(2, log_at(skill.skill_id, 15, day(1))).await.unwrap();

        let dashboard = engine.dashboard(1, now).await.unwrap();

        assert_eq!(dashboard.recent_activities.len(), 2);
        assert_eq!(dashboard.stats.total_learning_minutes, 90);
        assert_eq!(dashboard.stats.average_session_minutes, 45.0);
        assert_eq!(
            dashboard.recent_activities[0].skill_name.as_deref(),
            Some("Figma")
        );

        assert_eq!(dashboard.calendar_data.len(), 3);
        assert!(dashboard
            .calendar_data
            .windows(2)
            .all(|w| w[0].date > w[1].date));
        assert_eq!(dashboard.calendar_data[0].total_minutes, 30);
        assert_eq!(dashboard.calendar_data[2].total_hours, 1.5);

        assert_eq!(dashboard.skills_progress[0].learned_hours, 11.6);
    }
}
