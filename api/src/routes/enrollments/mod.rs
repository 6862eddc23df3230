//! # Enrollments Routes Module
//!
//! Routes for `/api/enrollments`: student membership in groups with
//! capacity enforcement.

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

use delete::delete_enrollment;
use get::{get_enrollment, get_group_capacity, list_enrollments};
use patch::update_enrollment_status;
use post::{bulk_enroll, create_enrollment};

/// Builds the `/enrollments` route group.
///
/// - `GET /enrollments` → `list_enrollments`
/// - `POST /enrollments` → `create_enrollment`
/// - `POST /enrollments/bulk` → `bulk_enroll`
/// - `GET /enrollments/capacity/{group_id}` → `get_group_capacity`
/// - `GET /enrollments/{enrollment_id}` → `get_enrollment`
/// - `DELETE /enrollments/{enrollment_id}` → `delete_enrollment`
/// - `PATCH /enrollments/{enrollment_id}/status` → `update_enrollment_status`
pub fn enrollments_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route("/bulk", post(bulk_enroll))
        .route("/capacity/{group_id}", get(get_group_capacity))
        .route(
            "/{enrollment_id}",
            get(get_enrollment).delete(delete_enrollment),
        )
        .route("/{enrollment_id}/status", patch(update_enrollment_status))
}
