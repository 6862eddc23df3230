//! # Courses Routes Module
//!
//! Routes for `/api/courses`. Mounted behind `allow_authenticated`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_course;
use get::{
    course_stats, get_course, get_course_by_code, list_course_groups, list_course_sessions,
    list_course_students, list_courses,
};
use post::create_course;
use put::update_course;

/// Builds the `/courses` route group.
///
/// - `GET /courses` → `list_courses`
/// - `POST /courses` → `create_course`
/// - `GET /courses/code/{code}` → `get_course_by_code`
/// - `GET /courses/{course_id}` → `get_course`
/// - `PUT /courses/{course_id}` → `update_course`
/// - `DELETE /courses/{course_id}` → `delete_course`
/// - `GET /courses/{course_id}/groups` → `list_course_groups`
/// - `GET /courses/{course_id}/stats` → `course_stats`
/// - `GET /courses/{course_id}/sessions` → `list_course_sessions`
/// - `GET /courses/{course_id}/students` → `list_course_students`
pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/code/{code}", get(get_course_by_code))
        .route(
            "/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{course_id}/groups", get(list_course_groups))
        .route("/{course_id}/stats", get(course_stats))
        .route("/{course_id}/sessions", get(list_course_sessions))
        .route("/{course_id}/students", get(list_course_students))
}
