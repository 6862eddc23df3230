//! # Groups Routes Module
//!
//! Routes for `/api/groups`: class groups, their roster, timetable and sessions.

use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_group;
use get::{
    get_group, get_group_stats, list_group_attendance, list_group_sessions, list_group_students,
    list_group_timetable, list_groups,
};
use post::create_group;
use put::{assign_teacher, update_group};

/// Builds the `/groups` route group.
///
/// - `GET /groups` → `list_groups`
/// - `POST /groups` → `create_group`
/// - `GET /groups/{group_id}` → `get_group`
/// - `PUT /groups/{group_id}` → `update_group`
/// - `DELETE /groups/{group_id}` → `delete_group`
/// - `GET /groups/{group_id}/students` → `list_group_students`
/// - `GET /groups/{group_id}/timetable` → `list_group_timetable`
/// - `GET /groups/{group_id}/sessions` → `list_group_sessions`
/// - `GET /groups/{group_id}/attendance` → `list_group_attendance`
/// - `GET /groups/{group_id}/stats` → `get_group_stats`
/// - `PUT /groups/{group_id}/teacher` → `assign_teacher`
pub fn groups_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route(
            "/{group_id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/{group_id}/students", get(list_group_students))
        .route("/{group_id}/timetable", get(list_group_timetable))
        .route("/{group_id}/sessions", get(list_group_sessions))
        .route("/{group_id}/attendance", get(list_group_attendance))
        .route("/{group_id}/stats", get(get_group_stats))
        .route("/{group_id}/teacher", put(assign_teacher))
}
