use axum::extract::State;
use axum::Json;
use skillstack_core::certificate::Certificate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/certificates
///
/// Certificates earned by the caller, newest first.
pub async fn list_certificates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Certificate>>>> {
    let certificates = state.engine.list_certificates(auth.user_id).await?;
    Ok(Json(DataResponse::new(certificates)))
}
