//! Handlers for the `/skills` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use skillstack_core::aggregation::{SkillDetail, SkillSummary};
use skillstack_core::engine::ledger::SubtopicStatusChange;
use skillstack_core::engine::recorder::RecordedSession;
use skillstack_core::engine::CreatedSkill;
use skillstack_core::skill::{CreateSkillRequest, Skill, SkillReview};
use skillstack_core::status::SubtopicStatus;
use skillstack_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::sessions;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /skills/subtopics/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateSubtopicStatus {
    pub status: String,
}

/// POST /api/skills
///
/// Create a skill; its category and subtopic plan are derived here.
pub async fn create_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSkillRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedSkill>>)> {
    let created = state.engine.create_skill(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/skills
pub async fn list_skills(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SkillSummary>>>> {
    let skills = state.engine.list_skills(auth.user_id).await?;
    Ok(Json(DataResponse::new(skills)))
}

/// GET /api/skills/{id}
pub async fn get_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SkillDetail>>> {
    let detail = state.engine.skill_detail(auth.user_id, skill_id).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// PUT /api/skills/subtopics/{id}/status
///
/// Unknown status strings are rejected as validation errors.
pub async fn update_subtopic_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(subtopic_id): Path<DbId>,
    Json(input): Json<UpdateSubtopicStatus>,
) -> AppResult<Json<DataResponse<SubtopicStatusChange>>> {
    let status: SubtopicStatus = input.status.parse()?;
    let change = state
        .engine
        .set_subtopic_status(auth.user_id, subtopic_id, status)
        .await?;
    Ok(Json(DataResponse::new(change)))
}

/// POST /api/skills/learning-sessions
pub async fn log_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedSession>>)> {
    sessions::record_session(&state, &auth, body).await
}

/// POST /api/skills/{id}/review
pub async fn submit_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
    Json(input): Json<SkillReview>,
) -> AppResult<Json<DataResponse<Skill>>> {
    let skill = state
        .engine
        .submit_review(auth.user_id, skill_id, input)
        .await?;
    Ok(Json(DataResponse::new(skill)))
}

/// DELETE /api/skills/{id}
///
/// Returns 204. Logged sessions for the skill are kept.
pub async fn delete_skill(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_skill(auth.user_id, skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
