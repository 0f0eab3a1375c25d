pub mod auth;
pub mod certificates;
pub mod dashboard;
pub mod health;
pub mod sessions;
pub mod skills;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /skills                                list, create
/// /skills/{id}                           detail, delete
/// /skills/{id}/review                    final review (POST)
/// /skills/subtopics/{id}/status          subtopic status (PUT)
/// /skills/learning-sessions              log a session (POST)
///
/// /sessions                              log a session (POST, alias)
///
/// /dashboard                             per-user dashboard
///
/// /certificates                          earned certificates
/// ```
///
/// Everything except `/auth` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/skills", skills::router())
        .nest("/sessions", sessions::router())
        .nest("/dashboard", dashboard::router())
        .nest("/certificates", certificates::router())
}
