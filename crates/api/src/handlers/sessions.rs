//! Session logging handlers and the body reader both routes share.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use skillstack_core::engine::recorder::RecordedSession;
use skillstack_core::session::LogSessionRequest;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Read a session logging body.
///
/// A missing or `null` `skill_id` or `duration_minutes` is a 400, as is any
/// other body that does not deserialize into [`LogSessionRequest`].
pub(crate) fn session_request_from_body(body: Value) -> AppResult<LogSessionRequest> {
    let present = |field: &str| body.get(field).is_some_and(|v| !v.is_null());
    if !present("skill_id") || !present("duration_minutes") {
        return Err(AppError::BadRequest(
            "skill_id and duration_minutes are required".into(),
        ));
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid session body: {e}")))
}

/// Validate the body and record the session for the caller.
pub(crate) async fn record_session(
    state: &AppState,
    auth: &AuthUser,
    body: Value,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedSession>>)> {
    let input = session_request_from_body(body)?;
    let recorded = state.engine.add_session(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(recorded))))
}

/// POST /api/sessions
///
/// Alias of `POST /api/skills/learning-sessions`.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedSession>>)> {
    record_session(&state, &auth, body).await
}
