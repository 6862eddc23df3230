use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Days, NaiveDate, NaiveTime};
use db::models::audit_log;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::{ListParams, db_error, fetch_page, not_found, parse_optional_date};

#[derive(Debug, Deserialize)]
pub struct AuditFilters {
    pub user_id: Option<i64>,
    pub resource_type: Option<String>,
    pub action: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn day_start(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// GET /api/audit
///
/// Newest entries first.
///
/// ### Query Parameters
/// - `page`, `per_page`
/// - `user_id`, `resource_type`, `action` (optional)
/// - `from`, `to` (optional): Inclusive day range, `YYYY-MM-DD`
pub async fn list_audit_entries(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<AuditFilters>,
) -> Response {
    let from = match parse_optional_date(filters.from.as_deref(), "from") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let to = match parse_optional_date(filters.to.as_deref(), "to") {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let mut condition = Condition::all();
    if let Some(user_id) = filters.user_id {
        condition = condition.add(audit_log::Column::UserId.eq(user_id));
    }
    if let Some(resource_type) = filters.resource_type {
        condition = condition.add(audit_log::Column::ResourceType.eq(resource_type));
    }
    if let Some(action) = filters.action {
        condition = condition.add(audit_log::Column::Action.eq(action));
    }
    if let Some(from) = from {
        condition = condition.add(audit_log::Column::CreatedAt.gte(day_start(from)));
    }
    if let Some(next_day) = to.and_then(|d| d.checked_add_days(Days::new(1))) {
        condition = condition.add(audit_log::Column::CreatedAt.lt(day_start(next_day)));
    }

    let query = audit_log::Entity::find()
        .filter(condition)
        .order_by_desc(audit_log::Column::CreatedAt)
        .order_by_desc(audit_log::Column::Id);

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Audit entries retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list audit entries", e),
    }
}

/// GET /api/audit/{audit_id}
pub async fn get_audit_entry(
    State(app_state): State<AppState>,
    Path(audit_id): Path<i64>,
) -> Response {
    match audit_log::Entity::find_by_id(audit_id).one(app_state.db()).await {
        Ok(Some(entry)) => (
            StatusCode::OK,
            Json(ApiResponse::success(entry, "Audit entry retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Audit entry"),
        Err(e) => db_error("Failed to load audit entry", e),
    }
}

/// GET /api/audit/resource/{resource_type}/{resource_id}
///
/// Full history of one resource, oldest first.
pub async fn list_resource_history(
    State(app_state): State<AppState>,
    Path((resource_type, resource_id)): Path<(String, i64)>,
) -> Response {
    let entries = audit_log::Entity::find()
        .filter(audit_log::Column::ResourceType.eq(resource_type))
        .filter(audit_log::Column::ResourceId.eq(resource_id))
        .order_by_asc(audit_log::Column::CreatedAt)
        .order_by_asc(audit_log::Column::Id)
        .all(app_state.db())
        .await;

    match entries {
        Ok(entries) => (
            StatusCode::OK,
            Json(ApiResponse::success(entries, "History retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to load resource history", e),
    }
}
