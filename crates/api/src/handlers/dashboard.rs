//! Handler for `GET /dashboard`.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use skillstack_core::aggregation::{Dashboard, DashboardStats, SkillSummary};
use skillstack_core::session::SessionActivity;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard payload with the calendar keyed by `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_activities: Vec<SessionActivity>,
    pub skills_progress: Vec<SkillSummary>,
    pub category_breakdown: BTreeMap<String, usize>,
    /// Most recent day first.
    pub calendar_data: IndexMap<String, CalendarEntry>,
}

#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub total_minutes: i64,
    pub session_count: i64,
    pub total_hours: f64,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        let calendar_data = dashboard
            .calendar_data
            .into_iter()
            .map(|day| {
                (
                    day.date.format("%Y-%m-%d").to_string(),
                    CalendarEntry {
                        total_minutes: day.total_minutes,
                        session_count: day.session_count,
                        total_hours: day.total_hours,
                    },
                )
            })
            .collect();

        DashboardResponse {
            stats: dashboard.stats,
            recent_activities: dashboard.recent_activities,
            skills_progress: dashboard.skills_progress,
            category_breakdown: dashboard.category_breakdown,
            calendar_data,
        }
    }
}

/// GET /api/dashboard
pub async fn get_dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let dashboard = state.engine.dashboard(auth.user_id, Utc::now()).await?;
    Ok(Json(DataResponse::new(DashboardResponse::from(dashboard))))
}
