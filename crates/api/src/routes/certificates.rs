use axum::routing::get;
use axum::Router;

use crate::handlers::certificates;
use crate::state::AppState;

/// Routes mounted at `/certificates`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(certificates::list_certificates))
}
