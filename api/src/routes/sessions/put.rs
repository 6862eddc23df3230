use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::session::{self, SessionStatus};
use db::scheduling::{TimeSlot, parse_time};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{DUPLICATE_MESSAGE, UpdateSessionRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, parse_optional_date,
};
use crate::routes::timetables::common::slot_error;

/// PUT /api/sessions/{session_id}
///
/// Reschedules a session. Only `planned` sessions can be modified.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (empty body, malformed date or times)
/// - `404 Not Found`
/// - `409 Conflict` (session not planned, or slot already taken)
pub async fn update_session(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(session_id): Path<i64>,
    Json(req): Json<UpdateSessionRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    let date = match parse_optional_date(req.scheduled_date.as_deref(), "scheduled_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let db = app_state.db();

    let existing = match session::Entity::find_by_id(session_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Session"),
        Err(e) => return db_error("Failed to load session", e),
    };
    if existing.status != SessionStatus::Planned {
        return error_response(StatusCode::CONFLICT, "Only planned sessions can be modified");
    }

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

    let mut active: session::ActiveModel = existing.into();
    if let Some(date) = date {
        active.scheduled_date = Set(date);
    }
    active.start_time = Set(slot.start());
    active.end_time = Set(slot.end());
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "session")
                    .by(auth.id())
                    .on(session_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Session updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Err(e) => db_error("Failed to update session", e),
    }
}
