//! # Sessions Routes Module
//!
//! Routes for `/api/sessions`: dated class occurrences, their status machine
//! and bulk generation from a group's timetable.

use axum::{
    Router,
    routing::{get, patch, post},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod patch;
pub mod post;
pub mod put;

use delete::delete_session;
use get::{
    get_session, get_session_stats, list_session_attendance, list_session_students,
    list_sessions, list_sessions_by_date,
};
use patch::{cancel_session, start_session, update_session_status};
use post::{create_session, generate_sessions};
use put::update_session;

/// Builds the `/sessions` route group.
///
/// - `GET /sessions` → `list_sessions`
/// - `POST /sessions` → `create_session`
/// - `POST /sessions/generate` → `generate_sessions`
/// - `GET /sessions/date/{date}` → `list_sessions_by_date`
/// - `GET /sessions/{session_id}` → `get_session`
/// - `PUT /sessions/{session_id}` → `update_session`
/// - `DELETE /sessions/{session_id}` → `delete_session`
/// - `PATCH /sessions/{session_id}/status` → `update_session_status`
/// - `POST /sessions/{session_id}/start` → `start_session`
/// - `POST /sessions/{session_id}/cancel` → `cancel_session`
/// - `GET /sessions/{session_id}/attendance` → `list_session_attendance`
/// - `GET /sessions/{session_id}/stats` → `get_session_stats`
/// - `GET /sessions/{session_id}/students` → `list_session_students`
pub fn sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/generate", post(generate_sessions))
        .route("/date/{date}", get(list_sessions_by_date))
        .route(
            "/{session_id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/{session_id}/status", patch(update_session_status))
        .route("/{session_id}/start", post(start_session))
        .route("/{session_id}/cancel", post(cancel_session))
        .route("/{session_id}/attendance", get(list_session_attendance))
        .route("/{session_id}/stats", get(get_session_stats))
        .route("/{session_id}/students", get(list_session_students))
}
