//! # Students Routes Module
//!
//! Routes for `/api/students`: profiles, enrollments and per-student attendance.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_student;
use get::{
    get_student, get_student_attendance_stats, get_student_by_code, list_student_attendance,
    list_student_enrollments, list_students,
};
use post::create_student;
use put::update_student;

/// Builds the `/students` route group.
///
/// - `GET /students` → `list_students`
/// - `POST /students` → `create_student`
/// - `GET /students/code/{code}` → `get_student_by_code`
/// - `GET /students/{student_id}` → `get_student`
/// - `PUT /students/{student_id}` → `update_student`
/// - `DELETE /students/{student_id}` → `delete_student`
/// - `GET /students/{student_id}/enrollments` → `list_student_enrollments`
/// - `GET /students/{student_id}/attendance` → `list_student_attendance`
/// - `GET /students/{student_id}/attendance/stats` → `get_student_attendance_stats`
pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/code/{code}", get(get_student_by_code))
        .route(
            "/{student_id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{student_id}/enrollments", get(list_student_enrollments))
        .route("/{student_id}/attendance", get(list_student_attendance))
        .route(
            "/{student_id}/attendance/stats",
            get(get_student_attendance_stats),
        )
}
