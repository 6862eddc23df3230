use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::attendance_record;
use db::models::audit_log::AuditEntry;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{UpdateAttendanceRequest, check_refs};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, validate};

/// PUT /api/attendance/{attendance_id}
///
/// Partially updates a record; `recorded_by` becomes the caller.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (validation failure or empty body)
/// - `404 Not Found` (record or absence reason)
pub async fn update_attendance(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateAttendanceRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match attendance_record::Entity::find_by_id(attendance_id).one(db).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("Attendance record"),
        Err(e) => return db_error("Failed to load attendance record", e),
    };
    match check_refs(db, None, None, req.absence_reason_id).await {
        Ok(Some(missing)) => return not_found(missing.label()),
        Ok(None) => {}
        Err(e) => return db_error("Failed to load absence reason", e),
    }

    let now = Utc::now();
    let mut active: attendance_record::ActiveModel = existing.into();
    if let Some(status) = req.status {
        active.status = Set(status);
        active.recorded_at = Set(now);
    }
    if let Some(reason) = req.absence_reason_id {
        active.absence_reason_id = Set(Some(reason));
    }
    if let Some(note) = &req.note {
        active.note = Set(Some(note.clone()));
    }
    active.recorded_by = Set(Some(auth.id()));
    active.updated_at = Set(now);

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "attendance")
                    .by(auth.id())
                    .on(attendance_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Attendance updated successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to update attendance", e),
    }
}
