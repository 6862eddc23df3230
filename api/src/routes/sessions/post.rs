use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::group;
use db::scheduling::{
    GenerationError, GenerationRequest, NewSession, SchedulingRepository,
    SeaOrmSchedulingRepository, SessionGenerator, TimeSlot,
};
use util::state::AppState;

use super::common::{CreateSessionRequest, DUPLICATE_MESSAGE, GenerateSessionsRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, parse_date};
use crate::routes::timetables::common::slot_error;

/// POST /api/sessions
///
/// Creates one `planned` session. The course is copied from the group.
///
/// ### Request Body
/// ```json
/// {
///   "group_id": 1,
///   "scheduled_date": "2025-03-12",
///   "start_time": "08:00",
///   "end_time": "09:30"
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (malformed date or times, end not after start)
/// - `404 Not Found` (group)
/// - `409 Conflict` (the group already has a session at that date and start time)
pub async fn create_session(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let date = match parse_date(&req.scheduled_date, "scheduled_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let slot = match TimeSlot::parse(&req.start_time, &req.end_time) {
        Ok(slot) => slot,
        Err(e) => return slot_error(e),
    };
    let db = app_state.db();
    let repo = SeaOrmSchedulingRepository::new(db.clone());

    let group: group::Model = match repo.find_group(req.group_id).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    let new = NewSession {
        group_id: group.id,
        course_id: group.course_id,
        scheduled_date: date,
        start_time: slot.start(),
        end_time: slot.end(),
        created_by: Some(auth.id()),
    };

    match repo.insert_session(new).await {
        Ok(Some(session)) => {
            audit(
                db,
                AuditEntry::new("create", "session")
                    .by(auth.id())
                    .on(session.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(session, "Session created successfully")),
            )
                .into_response()
        }
        Ok(None) => error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Err(e) => db_error("Failed to create session", e),
    }
}

/// POST /api/sessions/generate
///
/// Expands the group's weekly timetable into `planned` sessions for every
/// matching day of the inclusive range. Running it twice creates nothing new.
///
/// ### Request Body
/// ```json
/// { "group_id": 1, "start_date": "2025-01-01", "end_date": "2025-01-31" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ created, failed, skipped, message }`
/// - `400 Bad Request` (malformed dates, start after end, range too large)
/// - `404 Not Found` (group)
pub async fn generate_sessions(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<GenerateSessionsRequest>,
) -> Response {
    let start_date = match parse_date(&req.start_date, "start_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let end_date = match parse_date(&req.end_date, "end_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    if start_date > end_date {
        return error_response(
            StatusCode::BAD_REQUEST,
            "start_date must be on or before end_date",
        );
    }

    let db = app_state.db();
    let repo = SeaOrmSchedulingRepository::new(db.clone());
    match repo.find_group(req.group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let request = GenerationRequest {
        group_id: req.group_id,
        start_date,
        end_date,
        created_by: Some(auth.id()),
    };

    match SessionGenerator::new(&repo).generate(request).await {
        Ok(report) => {
            audit(
                db,
                AuditEntry::new("generate", "session")
                    .by(auth.id())
                    .on(req.group_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            let message = report.message.clone();
            (StatusCode::OK, Json(ApiResponse::success(report, message))).into_response()
        }
        Err(e @ (GenerationError::InvalidRange { .. } | GenerationError::RangeTooLarge { .. })) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(GenerationError::Storage(e)) => db_error("Failed to generate sessions", e),
    }
}
