use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{group, timetable_entry};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use util::state::AppState;

use super::common::{TimetableFilters, TimetableItem};
use crate::response::ApiResponse;
use crate::routes::common::{ListParams, db_error, fetch_page, not_found};

/// GET /api/timetables
///
/// Entries ordered by weekday, then start time.
///
/// ### Query Parameters
/// - `page`, `per_page`
/// - `group_id`, `course_id`, `weekday`, `status` (optional)
///
/// ### Responses
/// - `200 OK` with `{ items, page, per_page, total }`; each item carries `weekday_name`
pub async fn list_timetable_entries(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<TimetableFilters>,
) -> Response {
    let mut condition = Condition::all();
    if let Some(group_id) = filters.group_id {
        condition = condition.add(timetable_entry::Column::GroupId.eq(group_id));
    }
    if let Some(course_id) = filters.course_id {
        let groups = group::Entity::find()
            .select_only()
            .column(group::Column::Id)
            .filter(group::Column::CourseId.eq(course_id))
            .into_query();
        condition = condition.add(timetable_entry::Column::GroupId.in_subquery(groups));
    }
    if let Some(weekday) = filters.weekday {
        condition = condition.add(timetable_entry::Column::Weekday.eq(weekday));
    }
    if let Some(status) = filters.status {
        condition = condition.add(timetable_entry::Column::Status.eq(status));
    }

    let query = timetable_entry::Entity::find()
        .filter(condition)
        .order_by_asc(timetable_entry::Column::Weekday)
        .order_by_asc(timetable_entry::Column::StartTime);

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                page.map(TimetableItem::from),
                "Timetable entries retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to list timetable entries", e),
    }
}

/// GET /api/timetables/{entry_id}
pub async fn get_timetable_entry(
    State(app_state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Response {
    match timetable_entry::Entity::find_by_id(entry_id).one(app_state.db()).await {
        Ok(Some(entry)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TimetableItem::from(entry),
                "Timetable entry retrieved successfully",
            )),
        )
            .into_response(),
        Ok(None) => not_found("Timetable entry"),
        Err(e) => db_error("Failed to load timetable entry", e),
    }
}

/// GET /api/timetables/group/{group_id}
///
/// The whole weekly timetable of one group, unpaginated.
pub async fn list_group_timetable_entries(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let entries = timetable_entry::Entity::find()
        .filter(timetable_entry::Column::GroupId.eq(group_id))
        .order_by_asc(timetable_entry::Column::Weekday)
        .order_by_asc(timetable_entry::Column::StartTime)
        .all(db)
        .await;

    match entries {
        Ok(entries) => {
            let items: Vec<TimetableItem> = entries.into_iter().map(TimetableItem::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(items, "Timetable retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list group timetable", e),
    }
}
