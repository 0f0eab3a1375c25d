//! Skill lifecycle over HTTP: creation, sessions, subtopic status,
//! completion, certificates, review and deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_skill, delete_auth, get_auth, post_json_auth, put_json_auth, register,
};
use serde_json::{json, Value};

async fn subtopic_ids(app: &axum::Router, token: &str, skill_id: i64) -> Vec<i64> {
    let detail = body_json(get_auth(app, &format!("/api/skills/{skill_id}"), token).await).await;
    detail["data"]["subtopics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

async fn set_status(app: &axum::Router, token: &str, subtopic_id: i64, status: &str) -> axum::response::Response {
    put_json_auth(
        app,
        &format!("/api/skills/subtopics/{subtopic_id}/status"),
        json!({ "status": status }),
        token,
    )
    .await
}

async fn log_session(app: &axum::Router, token: &str, body: Value) -> axum::response::Response {
    post_json_auth(app, "/api/skills/learning-sessions", body, token).await
}

// ---------------------------------------------------------------------------
// Creation and reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_read_skill() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;

    let response = post_json_auth(
        &app,
        "/api/skills",
        json!({
            "name": "Figma",
            "resource_type": "course",
            "platform": "YouTube",
            "target_hours": 6,
            "user_subtopics": [{ "title": "Auto layout" }],
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["category"], "Design");
    assert_eq!(created["data"]["subtopics_created"], 7);
    let skill_id = created["data"]["skill_id"].as_i64().unwrap();

    let detail = body_json(get_auth(&app, &format!("/api/skills/{skill_id}"), &token).await).await;
    let data = &detail["data"];
    assert_eq!(data["name"], "Figma");
    assert_eq!(data["status"], "not-started");
    assert_eq!(data["progress"], 0.0);
    let subtopics = data["subtopics"].as_array().unwrap();
    assert_eq!(subtopics.len(), 7);
    assert_eq!(subtopics[0]["title"], "Auto layout");
    assert_eq!(subtopics[0]["status"], "to-learn");
    assert_eq!(subtopics[0]["expected_hours"], 0.9);

    let list = body_json(get_auth(&app, "/api/skills", &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["data"][0]["total_subtopics"], 7);
    assert_eq!(list["data"][0]["completed_subtopics"], 0);
}

#[tokio::test]
async fn invalid_skill_input_is_422() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;

    let response = post_json_auth(
        &app,
        "/api/skills",
        json!({
            "name": "Figma",
            "resource_type": "course",
            "platform": "online",
            "target_hours": -3,
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sessions_and_subtopics_drive_completion() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;
    let subtopics = subtopic_ids(&app, &token, skill_id).await;
    assert_eq!(subtopics.len(), 6);

    // No logged time yet.
    let early = set_status(&app, &token, subtopics[0], "completed").await;
    assert_eq!(early.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let first = log_session(
        &app,
        &token,
        json!({ "skill_id": skill_id, "subtopic_id": subtopics[0], "duration_minutes": 60 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;
    assert_eq!(first["data"]["session"]["duration_minutes"], 60);
    assert_eq!(first["data"]["subtopic"]["status"], "in-progress");
    assert_eq!(first["data"]["subtopic"]["hours_spent"], 1.0);
    assert_eq!(first["data"]["skill_status"], "in-progress");

    let last = subtopics.len() - 1;
    for (i, id) in subtopics.iter().enumerate() {
        if i > 0 {
            let logged = log_session(
                &app,
                &token,
                json!({ "skill_id": skill_id, "subtopic_id": id, "duration_minutes": "30" }),
            )
            .await;
            assert_eq!(logged.status(), StatusCode::CREATED);
        }

        let response = set_status(&app, &token, *id, "completed").await;
        assert_eq!(response.status(), StatusCode::OK);
        let change = body_json(response).await;
        assert_eq!(change["data"]["subtopic"]["status"], "completed");

        if i < last {
            assert_eq!(change["data"]["skill_completed"], false);
            assert!(change["data"]["certificate"].is_null());
        } else {
            assert_eq!(change["data"]["skill_completed"], true);
            assert_eq!(change["data"]["skill_status"], "completed");
            assert_eq!(change["data"]["certificate"]["skill_id"], skill_id);
        }
    }

    let detail = body_json(get_auth(&app, &format!("/api/skills/{skill_id}"), &token).await).await;
    assert_eq!(detail["data"]["status"], "completed");
    assert!(detail["data"]["completed_at"].is_string());
    assert_eq!(detail["data"]["progress"], 100.0);
    assert_eq!(detail["data"]["learned_hours"], 3.5);

    let certificates = body_json(get_auth(&app, "/api/certificates", &token).await).await;
    assert_eq!(certificates["data"].as_array().unwrap().len(), 1);

    // Moving a completed subtopic backwards is rejected.
    let backwards = set_status(&app, &token, subtopics[0], "in-progress").await;
    assert_eq!(backwards.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let review = post_json_auth(
        &app,
        &format!("/api/skills/{skill_id}/review"),
        json!({ "rating": 5, "notes": "Worth it" }),
        &token,
    )
    .await;
    assert_eq!(review.status(), StatusCode::OK);
    let review = body_json(review).await;
    assert_eq!(review["data"]["rating"], 5);
    assert_eq!(review["data"]["course_notes"], "Worth it");
}

// ---------------------------------------------------------------------------
// Validation and access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_status_and_bad_duration_are_422() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;
    let subtopics = subtopic_ids(&app, &token, skill_id).await;

    let unknown = set_status(&app, &token, subtopics[0], "done").await;
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

    for duration in [json!(0), json!(-15), json!("an hour")] {
        let response = log_session(
            &app,
            &token,
            json!({ "skill_id": skill_id, "duration_minutes": duration }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let review = post_json_auth(
        &app,
        &format!("/api/skills/{skill_id}/review"),
        json!({ "rating": 4 }),
        &token,
    )
    .await;
    assert_eq!(review.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn other_users_cannot_touch_a_skill() {
    let app = common::build_test_app();
    let owner = register(&app, "ada").await;
    let intruder = register(&app, "mallory").await;
    let skill_id = create_skill(&app, &owner, "Figma", 6.0).await;
    let subtopics = subtopic_ids(&app, &owner, skill_id).await;

    let detail = get_auth(&app, &format!("/api/skills/{skill_id}"), &intruder).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);

    let status = set_status(&app, &intruder, subtopics[0], "in-progress").await;
    assert_eq!(status.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(&app, &format!("/api/skills/{skill_id}"), &intruder).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let list = body_json(get_auth(&app, "/api/skills", &intruder).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_skill_and_subtopic_are_404() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;

    let detail = get_auth(&app, "/api/skills/9999", &token).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(detail).await["code"], "NOT_FOUND");

    let status = set_status(&app, &token, 9999, "in-progress").await;
    assert_eq!(status.status(), StatusCode::NOT_FOUND);

    let session = log_session(
        &app,
        &token,
        json!({ "skill_id": 9999, "duration_minutes": 10 }),
    )
    .await;
    assert_eq!(session.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Session alias and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sessions_alias_requires_core_fields() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;

    let missing = post_json_auth(&app, "/api/sessions", json!({ "skill_id": skill_id }), &token).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["code"], "BAD_REQUEST");

    let null_skill = post_json_auth(
        &app,
        "/api/sessions",
        json!({ "skill_id": null, "duration_minutes": 20 }),
        &token,
    )
    .await;
    assert_eq!(null_skill.status(), StatusCode::BAD_REQUEST);

    let ok = post_json_auth(
        &app,
        "/api/sessions",
        json!({ "skill_id": skill_id, "duration_minutes": 20.9, "notes": "  " }),
        &token,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::CREATED);
    let ok = body_json(ok).await;
    assert_eq!(ok["data"]["session"]["duration_minutes"], 20);
    assert!(ok["data"]["session"]["notes"].is_null());
    assert_eq!(ok["data"]["skill_status"], "in-progress");
}

#[tokio::test]
async fn both_session_routes_reject_missing_fields_alike() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;

    for uri in ["/api/skills/learning-sessions", "/api/sessions"] {
        let missing = post_json_auth(&app, uri, json!({ "skill_id": skill_id }), &token).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(missing).await["code"], "BAD_REQUEST");

        let no_skill = post_json_auth(&app, uri, json!({ "duration_minutes": 20 }), &token).await;
        assert_eq!(no_skill.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn multi_day_session_is_recorded() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;

    let response = log_session(
        &app,
        &token,
        json!({ "skill_id": skill_id, "duration_minutes": 1500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["session"]["duration_minutes"], 1500);

    let detail = body_json(get_auth(&app, &format!("/api/skills/{skill_id}"), &token).await).await;
    assert_eq!(detail["data"]["learned_hours"], 25.0);
}

#[tokio::test]
async fn delete_removes_skill_but_keeps_learned_time() {
    let app = common::build_test_app();
    let token = register(&app, "ada").await;
    let skill_id = create_skill(&app, &token, "Figma", 6.0).await;
    log_session(
        &app,
        &token,
        json!({ "skill_id": skill_id, "duration_minutes": 45 }),
    )
    .await;

    let deleted = delete_auth(&app, &format!("/api/skills/{skill_id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let detail = get_auth(&app, &format!("/api/skills/{skill_id}"), &token).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);

    let dashboard = body_json(get_auth(&app, "/api/dashboard", &token).await).await;
    let recent = dashboard["data"]["recent_activities"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert!(recent[0]["skill_name"].is_null());
    assert_eq!(dashboard["data"]["stats"]["total_skills"], 0);
}
