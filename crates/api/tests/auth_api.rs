//! Registration, login and token checks.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json};
use serde_json::json;

fn registration(username: &str, email: &str, password: &str) -> serde_json::Value {
    json!({ "username": username, "email": email, "password": password })
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_token_and_profile() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/auth/register",
        registration("ada", "ada@example.com", "lovelace"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["expires_in"], 3600);
    assert_eq!(data["user"]["username"], "ada");
    assert_eq!(data["user"]["email"], "ada@example.com");
    assert!(data["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    let app = common::build_test_app();
    common::register(&app, "ada").await;

    let same_name = post_json(
        &app,
        "/api/auth/register",
        registration("ada", "other@example.com", "lovelace"),
    )
    .await;
    assert_eq!(same_name.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(same_name).await["code"], "CONFLICT");

    let same_email = post_json(
        &app,
        "/api/auth/register",
        registration("grace", "ada@example.com", "lovelace"),
    )
    .await;
    assert_eq!(same_email.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn short_password_and_bad_email_are_rejected() {
    let app = common::build_test_app();

    let short = post_json(
        &app,
        "/api/auth/register",
        registration("ada", "ada@example.com", "abc"),
    )
    .await;
    assert_eq!(short.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(short).await["code"], "VALIDATION_ERROR");

    let bad_email = post_json(
        &app,
        "/api/auth/register",
        registration("ada", "not-an-email", "lovelace"),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_correct_and_wrong_password() {
    let app = common::build_test_app();
    common::register(&app, "ada").await;

    let ok = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "ada", "password": "secret-pass" }),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let token = body_json(ok).await["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let skills = get_auth(&app, "/api/skills", &token).await;
    assert_eq!(skills.status(), StatusCode::OK);

    let wrong = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "ada", "password": "nope-nope" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "nobody", "password": "secret-pass" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(unknown).await["error"],
        "Invalid username or password"
    );
}

// ---------------------------------------------------------------------------
// Bearer extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = common::build_test_app();

    let missing = get(&app, "/api/skills").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(missing).await["code"], "UNAUTHORIZED");

    let garbage = get_auth(&app, "/api/dashboard", "not-a-token").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
