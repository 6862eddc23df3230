//! # Teachers Routes Module
//!
//! Routes for `/api/teachers`. Mounted behind `allow_authenticated`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_teacher;
use get::{
    get_teacher, get_teacher_by_code, get_teacher_stats, list_teacher_groups,
    list_teacher_sessions, list_teacher_timetable, list_teachers,
};
use post::create_teacher;
use put::update_teacher;

/// Builds the `/teachers` route group.
///
/// - `GET /teachers` → `list_teachers`
/// - `POST /teachers` → `create_teacher`
/// - `GET /teachers/code/{code}` → `get_teacher_by_code`
/// - `GET /teachers/{teacher_id}` → `get_teacher`
/// - `PUT /teachers/{teacher_id}` → `update_teacher`
/// - `DELETE /teachers/{teacher_id}` → `delete_teacher`
/// - `GET /teachers/{teacher_id}/groups` → `list_teacher_groups`
/// - `GET /teachers/{teacher_id}/timetable` → `list_teacher_timetable`
/// - `GET /teachers/{teacher_id}/sessions` → `list_teacher_sessions`
/// - `GET /teachers/{teacher_id}/stats` → `get_teacher_stats`
pub fn teachers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route("/code/{code}", get(get_teacher_by_code))
        .route(
            "/{teacher_id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/{teacher_id}/groups", get(list_teacher_groups))
        .route("/{teacher_id}/timetable", get(list_teacher_timetable))
        .route("/{teacher_id}/sessions", get(list_teacher_sessions))
        .route("/{teacher_id}/stats", get(get_teacher_stats))
}
