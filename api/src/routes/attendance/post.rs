use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::attendance_record::{self, AttendanceStatus};
use db::models::audit_log::AuditEntry;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use util::state::AppState;

use super::common::{
    BulkAttendanceReport, BulkAttendanceRequest, BulkDetail, CreateAttendanceRequest,
    JustifyRequest, Mark, MarkRequest, check_refs, upsert,
};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

const DUPLICATE_MESSAGE: &str = "Attendance already recorded for this student in this session";

/// POST /api/attendance
///
/// ### Request Body
/// ```json
/// {
///   "session_id": 10,
///   "student_id": 4,
///   "status": "absent",
///   "absence_reason_id": 2,
///   "note": "Called in sick"
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
/// - `404 Not Found` (session, student or absence reason)
/// - `409 Conflict` (already recorded)
pub async fn create_attendance(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateAttendanceRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match check_refs(
        db,
        Some(req.session_id),
        Some(req.student_id),
        req.absence_reason_id,
    )
    .await
    {
        Ok(Some(missing)) => return not_found(missing.label()),
        Ok(None) => {}
        Err(e) => return db_error("Failed to check attendance references", e),
    }
    match attendance_record::Model::find_for(db, req.session_id, req.student_id).await {
        Ok(Some(_)) => return error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Ok(None) => {}
        Err(e) => return db_error("Failed to check existing attendance", e),
    }

    let now = Utc::now();
    let created = attendance_record::ActiveModel {
        session_id: Set(req.session_id),
        student_id: Set(req.student_id),
        status: Set(req.status),
        recorded_at: Set(now),
        absence_reason_id: Set(req.absence_reason_id),
        note: Set(req.note.clone()),
        recorded_by: Set(Some(auth.id())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(record) => {
            audit(
                db,
                AuditEntry::new("create", "attendance")
                    .by(auth.id())
                    .on(record.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(record, "Attendance recorded successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Err(e) => db_error("Failed to record attendance", e),
    }
}

/// POST /api/attendance/bulk
///
/// Records a whole session at once. Each entry is created, or overwrites
/// the student's existing record.
///
/// ### Request Body
/// ```json
/// {
///   "session_id": 10,
///   "records": [
///     { "student_id": 4, "status": "present" },
///     { "student_id": 5, "status": "absent", "absence_reason_id": 1 }
///   ]
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ created, updated, failed, details }`
/// - `400 Bad Request` (validation failure)
/// - `404 Not Found` (session)
pub async fn bulk_attendance(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<BulkAttendanceRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match check_refs(db, Some(req.session_id), None, None).await {
        Ok(Some(missing)) => return not_found(missing.label()),
        Ok(None) => {}
        Err(e) => return db_error("Failed to load session", e),
    }

    let mut report = BulkAttendanceReport::default();
    for entry in &req.records {
        let detail = bulk_one(db, &auth, req.session_id, entry, &mut report).await;
        report.details.push(detail);
    }

    audit(
        db,
        AuditEntry::new("bulk_record", "attendance")
            .by(auth.id())
            .on(req.session_id)
            .with_payload(&req)
            .from_ip(ip),
    )
    .await;

    let message = format!(
        "{} created, {} updated, {} failed",
        report.created, report.updated, report.failed
    );
    (StatusCode::OK, Json(ApiResponse::success(report, message))).into_response()
}

async fn bulk_one(
    db: &DatabaseConnection,
    auth: &AuthUser,
    session_id: i64,
    entry: &super::common::BulkRecord,
    report: &mut BulkAttendanceReport,
) -> BulkDetail {
    let failed = |report: &mut BulkAttendanceReport, message: String| {
        report.failed += 1;
        BulkDetail {
            student_id: entry.student_id,
            success: false,
            action: "failed",
            message,
            attendance_id: None,
        }
    };

    match check_refs(db, None, Some(entry.student_id), entry.absence_reason_id).await {
        Ok(Some(missing)) => return failed(report, format!("{} not found", missing.label())),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, session_id, student_id = entry.student_id, "Bulk attendance lookup failed");
            return failed(report, "Database error".into());
        }
    }

    let mark = Mark {
        session_id,
        student_id: entry.student_id,
        status: entry.status,
        absence_reason_id: entry.absence_reason_id,
        note: entry.note.clone(),
        recorded_by: auth.id(),
    };
    match upsert(db, mark).await {
        Ok((record, created)) => {
            let action = if created {
                report.created += 1;
                "created"
            } else {
                report.updated += 1;
                "updated"
            };
            BulkDetail {
                student_id: entry.student_id,
                success: true,
                action,
                message: format!("Attendance {action}"),
                attendance_id: Some(record.id),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, session_id, student_id = entry.student_id, "Bulk attendance write failed");
            failed(report, "Database error".into())
        }
    }
}

async fn mark(
    db: &DatabaseConnection,
    auth: &AuthUser,
    ip: String,
    req: MarkRequest,
    status: AttendanceStatus,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    match check_refs(db, Some(req.session_id), Some(req.student_id), None).await {
        Ok(Some(missing)) => return not_found(missing.label()),
        Ok(None) => {}
        Err(e) => return db_error("Failed to check attendance references", e),
    }

    let mark = Mark {
        session_id: req.session_id,
        student_id: req.student_id,
        status,
        absence_reason_id: None,
        note: req.note.clone(),
        recorded_by: auth.id(),
    };
    match upsert(db, mark).await {
        Ok((record, created)) => {
            audit(
                db,
                AuditEntry::new(if created { "create" } else { "update" }, "attendance")
                    .by(auth.id())
                    .on(record.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            let code = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                code,
                Json(ApiResponse::success(record, format!("Student marked as {status}"))),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to mark attendance", e),
    }
}

/// POST /api/attendance/mark-present
///
/// ### Request Body
/// ```json
/// { "session_id": 10, "student_id": 4 }
/// ```
///
/// ### Responses
/// - `201 Created` for a new record, `200 OK` when an existing one was overwritten
/// - `404 Not Found` (session or student)
pub async fn mark_present(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<MarkRequest>,
) -> Response {
    mark(app_state.db(), &auth, ip, req, AttendanceStatus::Present).await
}

/// POST /api/attendance/mark-absent
pub async fn mark_absent(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<MarkRequest>,
) -> Response {
    mark(app_state.db(), &auth, ip, req, AttendanceStatus::Absent).await
}

/// POST /api/attendance/mark-late
pub async fn mark_late(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<MarkRequest>,
) -> Response {
    mark(app_state.db(), &auth, ip, req, AttendanceStatus::Late).await
}

/// POST /api/attendance/{attendance_id}/justify
///
/// Turns an `absent` record into `excused` with a reason.
///
/// ### Request Body
/// ```json
/// { "absence_reason_id": 2, "note": "Medical certificate" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (record is not `absent`)
/// - `404 Not Found` (record or absence reason)
pub async fn justify_absence(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(attendance_id): Path<i64>,
    Json(req): Json<JustifyRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match attendance_record::Entity::find_by_id(attendance_id).one(db).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("Attendance record"),
        Err(e) => return db_error("Failed to load attendance record", e),
    };
    if !existing.can_be_justified() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Only absences can be justified",
        );
    }
    match check_refs(db, None, None, Some(req.absence_reason_id)).await {
        Ok(Some(missing)) => return not_found(missing.label()),
        Ok(None) => {}
        Err(e) => return db_error("Failed to load absence reason", e),
    }

    let mut active: attendance_record::ActiveModel = existing.into();
    active.status = Set(AttendanceStatus::Excused);
    active.absence_reason_id = Set(Some(req.absence_reason_id));
    if let Some(note) = &req.note {
        active.note = Set(Some(note.clone()));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("justify", "attendance")
                    .by(auth.id())
                    .on(attendance_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Absence justified successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to justify absence", e),
    }
}
