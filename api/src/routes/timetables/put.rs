use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::timetable_entry;
use db::scheduling::{TimeSlot, parse_time};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{
    CONFLICT_MESSAGE, TimetableItem, UpdateTimetableRequest, find_conflict, slot_error,
};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, validate};

/// PUT /api/timetables/{entry_id}
///
/// Partial update. Missing fields keep their stored values and the merged
/// slot is re-checked against the group's other entries.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (empty body, invalid weekday or times)
/// - `404 Not Found`
/// - `409 Conflict`
pub async fn update_timetable_entry(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(entry_id): Path<i64>,
    Json(req): Json<UpdateTimetableRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match timetable_entry::Entity::find_by_id(entry_id).one(db).await {
        Ok(Some(e)) => e,
        Ok(None) => return not_found("Timetable entry"),
        Err(e) => return db_error("Failed to load timetable entry", e),
    };

    let start = match req.start_time.as_deref().map(parse_time).transpose() {
        Ok(t) => t.unwrap_or(existing.start_time),
        Err(e) => return slot_error(e.into()),
    };
    let end = match req.end_time.as_deref().map(parse_time).transpose() {
        Ok(t) => t.unwrap_or(existing.end_time),
        Err(e) => return slot_error(e.into()),
    };
    let slot = match TimeSlot::new(start, end) {
        Ok(slot) => slot,
        Err(e) => return slot_error(e),
    };
    let weekday = req.weekday.unwrap_or(existing.weekday);

    match find_conflict(db, existing.group_id, weekday, slot, Some(entry_id)).await {
        Ok(Some(_)) => return error_response(StatusCode::CONFLICT, CONFLICT_MESSAGE),
        Ok(None) => {}
        Err(e) => return db_error("Failed to check timetable conflicts", e),
    }

    let mut active: timetable_entry::ActiveModel = existing.into();
    active.weekday = Set(weekday);
    active.start_time = Set(slot.start());
    active.end_time = Set(slot.end());
    if let Some(location) = &req.location {
        active.location = Set(Some(location.clone()));
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "timetable_entry")
                    .by(auth.id())
                    .on(entry_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    TimetableItem::from(updated),
                    "Timetable entry updated successfully",
                )),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to update timetable entry", e),
    }
}
