use api::routes::{auth::common::issue_tokens, routes};
use axum::Router;
use db::models::auth_token::IssueContext;
use db::models::status::LifecycleStatus;
use db::models::user::{self, Role};
use db::models::{course, group};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use util::state::AppState;

pub const TEST_PASSWORD: &str = "secret1";

/// Router mounted under `/api` over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    let state = AppState::new(setup_test_db().await);
    let app = Router::new().nest("/api", routes(state.clone()));
    (app, state)
}

pub async fn create_user(db: &DatabaseConnection, username: &str, role: Role) -> user::Model {
    user::Model::create(
        db,
        username,
        &format!("{username}@test.com"),
        TEST_PASSWORD,
        username,
        role,
        LifecycleStatus::Active,
    )
    .await
    .expect("Failed to create user")
}

/// Issues a stored access token, the same way a login does.
pub async fn token_for(db: &DatabaseConnection, account: &user::Model) -> String {
    match issue_tokens(db, account.clone(), IssueContext::default()).await {
        Ok(tokens) => tokens.access_token,
        Err(_) => panic!("Failed to issue tokens for {}", account.username),
    }
}

/// A course with one group of the given capacity.
pub async fn create_group(db: &DatabaseConnection, max_capacity: Option<i32>) -> group::Model {
    let course = course::Model::create(db, "MAT101", "Mathematics", None)
        .await
        .expect("Failed to create course");
    group::Model::create(db, course.id, "Group A", 2025, None, max_capacity)
        .await
        .expect("Failed to create group")
}

/// Creates a student through the API and returns the profile id.
pub async fn create_student(app: &Router, token: &str, code: &str) -> i64 {
    let body = serde_json::json!({
        "username": format!("student_{code}"),
        "email": format!("{code}@school.test"),
        "password": TEST_PASSWORD,
        "full_name": format!("Student {code}"),
        "student_code": code
    });
    let (status, json) = super::send(app, "POST", "/api/students", Some(token), Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

/// Creates a teacher through the API and returns the profile id.
pub async fn create_teacher(app: &Router, token: &str, code: &str) -> i64 {
    let body = serde_json::json!({
        "username": format!("teacher_{code}"),
        "email": format!("{code}@staff.test"),
        "password": TEST_PASSWORD,
        "full_name": format!("Teacher {code}"),
        "teacher_code": code
    });
    let (status, json) = super::send(app, "POST", "/api/teachers", Some(token), Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

pub async fn enroll(app: &Router, token: &str, group_id: i64, student_id: i64) {
    let body = serde_json::json!({ "student_id": student_id, "group_id": group_id });
    let (status, json) = super::send(app, "POST", "/api/enrollments", Some(token), Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "{json}");
}

/// Creates a single 08:00-09:00 session on `date` and returns its id.
pub async fn create_session(app: &Router, token: &str, group_id: i64, date: &str) -> i64 {
    let body = serde_json::json!({
        "group_id": group_id,
        "scheduled_date": date,
        "start_time": "08:00",
        "end_time": "09:00"
    });
    let (status, json) = super::send(app, "POST", "/api/sessions", Some(token), Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

/// Posts to `/api/attendance/mark-{kind}` (`present`, `absent` or `late`).
pub async fn mark(app: &Router, token: &str, kind: &str, session_id: i64, student_id: i64) {
    let body = serde_json::json!({ "session_id": session_id, "student_id": student_id });
    let uri = format!("/api/attendance/mark-{kind}");
    let (status, json) = super::send(app, "POST", &uri, Some(token), Some(body)).await;
    assert!(status.is_success(), "{status} {json}");
}
