use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{enrollment, group};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use util::state::AppState;

use super::common::EnrollmentFilters;
use crate::response::ApiResponse;
use crate::routes::common::{ListParams, apply_sort, db_error, fetch_page, not_found};

/// GET /api/enrollments
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`enrolled_at`, `status`)
/// - `student_id`, `group_id`, `status` (optional)
pub async fn list_enrollments(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<EnrollmentFilters>,
) -> Response {
    let mut condition = Condition::all();
    if let Some(student_id) = filters.student_id {
        condition = condition.add(enrollment::Column::StudentId.eq(student_id));
    }
    if let Some(group_id) = filters.group_id {
        condition = condition.add(enrollment::Column::GroupId.eq(group_id));
    }
    if let Some(status) = filters.status {
        condition = condition.add(enrollment::Column::Status.eq(status));
    }

    let query = apply_sort(
        enrollment::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["enrolled_at", "status"],
        enrollment::Column::EnrolledAt,
    );

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Enrollments retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list enrollments", e),
    }
}

/// GET /api/enrollments/{enrollment_id}
pub async fn get_enrollment(
    State(app_state): State<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Response {
    match enrollment::Entity::find_by_id(enrollment_id).one(app_state.db()).await {
        Ok(Some(e)) => (
            StatusCode::OK,
            Json(ApiResponse::success(e, "Enrollment retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Enrollment"),
        Err(e) => db_error("Failed to load enrollment", e),
    }
}

/// GET /api/enrollments/capacity/{group_id}
///
/// `{ capacity, enrolled, available, full }`; `available` is `null` for
/// groups without a capacity.
pub async fn get_group_capacity(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let group = match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    match enrollment::Model::capacity(db, &group).await {
        Ok(capacity) => (
            StatusCode::OK,
            Json(ApiResponse::success(capacity, "Capacity retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute capacity", e),
    }
}
