use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::{group, timetable_entry};
use db::scheduling::TimeSlot;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{
    CONFLICT_MESSAGE, ConflictResult, CreateTimetableRequest, TimetableItem,
    ValidateConflictRequest, find_conflict, slot_error,
};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, validate};

/// POST /api/timetables
///
/// ### Request Body
/// ```json
/// {
///   "group_id": 1,
///   "weekday": 3,
///   "start_time": "08:00",
///   "end_time": "09:30",
///   "location": "Lab 2"
/// }
/// ```
///
/// Times accept `HH:MM` or `HH:MM:SS`. `status` defaults to `active`.
///
/// ### Responses
/// - `201 Created` with the entry and its `weekday_name`
/// - `400 Bad Request` (weekday outside 1..7, malformed time, end not after start)
/// - `404 Not Found` (group)
/// - `409 Conflict` (overlaps an active entry of the group on that weekday)
pub async fn create_timetable_entry(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateTimetableRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let slot = match TimeSlot::parse(&req.start_time, &req.end_time) {
        Ok(slot) => slot,
        Err(e) => return slot_error(e),
    };
    let db = app_state.db();

    match group::Entity::find_by_id(req.group_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    match find_conflict(db, req.group_id, req.weekday, slot, None).await {
        Ok(Some(existing)) => {
            tracing::info!(
                group_id = req.group_id,
                weekday = req.weekday,
                conflicting_id = existing.id,
                "Rejected overlapping timetable entry"
            );
            return error_response(StatusCode::CONFLICT, CONFLICT_MESSAGE);
        }
        Ok(None) => {}
        Err(e) => return db_error("Failed to check timetable conflicts", e),
    }

    let now = Utc::now();
    let created = timetable_entry::ActiveModel {
        group_id: Set(req.group_id),
        weekday: Set(req.weekday),
        start_time: Set(slot.start()),
        end_time: Set(slot.end()),
        location: Set(req.location.clone()),
        status: Set(req.status.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(entry) => {
            audit(
                db,
                AuditEntry::new("create", "timetable_entry")
                    .by(auth.id())
                    .on(entry.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    TimetableItem::from(entry),
                    "Timetable entry created successfully",
                )),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to create timetable entry", e),
    }
}

/// POST /api/timetables/validate-conflict
///
/// Dry run of the conflict check. Pass `exclude_id` when validating an edit
/// of an existing entry.
///
/// ### Request Body
/// ```json
/// {
///   "group_id": 1,
///   "weekday": 3,
///   "start_time": "08:30",
///   "end_time": "09:00",
///   "exclude_id": null
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ has_conflict, conflicting_entry }`
/// - `400 Bad Request` (invalid weekday or times)
pub async fn validate_conflict(
    State(app_state): State<AppState>,
    Json(req): Json<ValidateConflictRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let slot = match TimeSlot::parse(&req.start_time, &req.end_time) {
        Ok(slot) => slot,
        Err(e) => return slot_error(e),
    };

    match find_conflict(app_state.db(), req.group_id, req.weekday, slot, req.exclude_id).await {
        Ok(found) => {
            let result = ConflictResult {
                has_conflict: found.is_some(),
                conflicting_entry: found.map(TimetableItem::from),
            };
            let message = if result.has_conflict {
                CONFLICT_MESSAGE
            } else {
                "No conflict found"
            };
            (StatusCode::OK, Json(ApiResponse::success(result, message))).into_response()
        }
        Err(e) => db_error("Failed to check timetable conflicts", e),
    }
}
