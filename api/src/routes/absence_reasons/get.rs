use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::absence_reason;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::{ListParams, apply_sort, db_error, fetch_page, not_found};

/// GET /api/absence-reasons
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`code`, `description`)
/// - `q` (optional): Partial match on code or description
pub async fn list_absence_reasons(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let mut query = absence_reason::Entity::find();
    if let Some(q) = params.search() {
        query = query.filter(
            Condition::any()
                .add(absence_reason::Column::Code.contains(q.to_uppercase()))
                .add(absence_reason::Column::Description.contains(&q)),
        );
    }
    let query = apply_sort(
        query,
        params.sort.as_deref(),
        &["code", "description"],
        absence_reason::Column::Code,
    );

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Absence reasons retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list absence reasons", e),
    }
}

/// GET /api/absence-reasons/{reason_id}
pub async fn get_absence_reason(
    State(app_state): State<AppState>,
    Path(reason_id): Path<i64>,
) -> Response {
    match absence_reason::Entity::find_by_id(reason_id).one(app_state.db()).await {
        Ok(Some(r)) => (
            StatusCode::OK,
            Json(ApiResponse::success(r, "Absence reason retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Absence reason"),
        Err(e) => db_error("Failed to load absence reason", e),
    }
}

/// GET /api/absence-reasons/code/{code}
pub async fn get_absence_reason_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match absence_reason::Model::find_by_code(app_state.db(), &code).await {
        Ok(Some(r)) => (
            StatusCode::OK,
            Json(ApiResponse::success(r, "Absence reason retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Absence reason"),
        Err(e) => db_error("Failed to load absence reason", e),
    }
}
