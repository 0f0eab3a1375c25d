//! Route definitions for the `/skills` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::skills;
use crate::state::AppState;

/// Routes mounted at `/skills`.
///
/// ```text
/// GET    /                          -> list_skills
/// POST   /                          -> create_skill
/// GET    /{id}                      -> get_skill
/// DELETE /{id}                      -> delete_skill
/// POST   /{id}/review               -> submit_review
/// PUT    /subtopics/{id}/status     -> update_subtopic_status
/// POST   /learning-sessions         -> log_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(skills::list_skills).post(skills::create_skill))
        .route("/learning-sessions", post(skills::log_session))
        .route(
            "/subtopics/{id}/status",
            put(skills::update_subtopic_status),
        )
        .route("/{id}", get(skills::get_skill).delete(skills::delete_skill))
        .route("/{id}/review", post(skills::submit_review))
}
