use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Column as UserColumn, Entity as UserEntity};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use util::state::AppState;

use super::common::UserFilters;
use crate::response::ApiResponse;
use crate::routes::common::{ListParams, apply_sort, db_error, fetch_page, not_found};

/// GET /api/users
///
/// Retrieve a paginated list of users. Requires admin privileges.
///
/// ### Query Parameters
/// - `page` (optional): Page number (default: 1)
/// - `per_page` (optional): Items per page (default: 20, clamped to 1..100)
/// - `q` (optional): Partial match against username, email or full name
/// - `role` (optional): `admin`, `teacher` or `student`
/// - `status` (optional): `active`, `inactive` or `suspended`
/// - `sort` (optional): Comma-separated fields (`username`, `email`, `full_name`,
///   `created_at`). Use `-` prefix for descending
///
/// ### Examples
/// ```http
/// GET /api/users?role=teacher&sort=-created_at
/// GET /api/users?q=doe&page=2&per_page=10
/// ```
///
/// ### Responses
/// - `200 OK` with `{ items, page, per_page, total }`
/// - `401 Unauthorized` / `403 Forbidden`
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<UserFilters>,
) -> Response {
    let db = app_state.db();
    let mut condition = Condition::all();

    if let Some(q) = params.search() {
        condition = condition.add(
            Condition::any()
                .add(UserColumn::Username.contains(&q))
                .add(UserColumn::Email.contains(&q))
                .add(UserColumn::FullName.contains(&q)),
        );
    }
    if let Some(role) = filters.role {
        condition = condition.add(UserColumn::Role.eq(role));
    }
    if let Some(status) = filters.status {
        condition = condition.add(UserColumn::Status.eq(status));
    }

    let query = apply_sort(
        UserEntity::find().filter(condition),
        params.sort.as_deref(),
        &["username", "email", "full_name", "created_at"],
        UserColumn::Id,
    );

    match fetch_page(db, query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Users retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list users", e),
    }
}

/// GET /api/users/{user_id}
///
/// ### Responses
/// - `200 OK` with the user (password hash omitted)
/// - `404 Not Found`
pub async fn get_user(State(app_state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    match UserEntity::find_by_id(user_id).one(app_state.db()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("User"),
        Err(e) => db_error("Failed to load user", e),
    }
}
