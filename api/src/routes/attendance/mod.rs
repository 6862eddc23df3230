//! # Attendance Routes Module
//!
//! Routes for `/api/attendance`: per-student records for each session,
//! bulk capture, quick marks and justification of absences.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_attendance;
use get::{
    get_attendance, get_group_report, get_group_stats, get_student_stats, list_attendance,
};
use post::{
    bulk_attendance, create_attendance, justify_absence, mark_absent, mark_late, mark_present,
};
use put::update_attendance;

/// Builds the `/attendance` route group.
///
/// - `GET /attendance` → `list_attendance`
/// - `POST /attendance` → `create_attendance`
/// - `POST /attendance/bulk` → `bulk_attendance`
/// - `POST /attendance/mark-present` → `mark_present`
/// - `POST /attendance/mark-absent` → `mark_absent`
/// - `POST /attendance/mark-late` → `mark_late`
/// - `GET /attendance/student/{student_id}/stats` → `get_student_stats`
/// - `GET /attendance/report/group/{group_id}` → `get_group_report`
/// - `GET /attendance/stats/group/{group_id}` → `get_group_stats`
/// - `GET /attendance/{attendance_id}` → `get_attendance`
/// - `PUT /attendance/{attendance_id}` → `update_attendance`
/// - `DELETE /attendance/{attendance_id}` → `delete_attendance`
/// - `POST /attendance/{attendance_id}/justify` → `justify_absence`
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(create_attendance))
        .route("/bulk", post(bulk_attendance))
        .route("/mark-present", post(mark_present))
        .route("/mark-absent", post(mark_absent))
        .route("/mark-late", post(mark_late))
        .route("/student/{student_id}/stats", get(get_student_stats))
        .route("/report/group/{group_id}", get(get_group_report))
        .route("/stats/group/{group_id}", get(get_group_stats))
        .route(
            "/{attendance_id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
        .route("/{attendance_id}/justify", post(justify_absence))
}
