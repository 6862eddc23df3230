use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::group;
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::{
    BulkDetail, BulkEnrollReport, BulkEnrollRequest, CreateEnrollmentRequest, EnrollRejection,
    enroll,
};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// POST /api/enrollments
///
/// ### Request Body
/// ```json
/// { "student_id": 4, "group_id": 2 }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `404 Not Found` (student or group)
/// - `409 Conflict` (already enrolled, or the group is full)
pub async fn create_enrollment(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateEnrollmentRequest>,
) -> Response {
    let db = app_state.db();

    let group = match group::Entity::find_by_id(req.group_id).one(db).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    match enroll(db, &group, req.student_id).await {
        Ok(Ok(created)) => {
            audit(
                db,
                AuditEntry::new("create", "enrollment")
                    .by(auth.id())
                    .on(created.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(created, "Student enrolled successfully")),
            )
                .into_response()
        }
        Ok(Err(EnrollRejection::StudentNotFound)) => not_found("Student"),
        Ok(Err(rejection)) => error_response(StatusCode::CONFLICT, rejection.message()),
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            EnrollRejection::AlreadyEnrolled.message(),
        ),
        Err(e) => db_error("Failed to create enrollment", e),
    }
}

/// POST /api/enrollments/bulk
///
/// Enrolls several students into one group. Each student is handled on its
/// own; one failure does not stop the rest.
///
/// ### Request Body
/// ```json
/// { "group_id": 2, "student_ids": [4, 5, 6] }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ created, failed, details }`
/// - `400 Bad Request` (empty id list)
/// - `404 Not Found` (group)
pub async fn bulk_enroll(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<BulkEnrollRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let group = match group::Entity::find_by_id(req.group_id).one(db).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    let mut report = BulkEnrollReport::default();
    for &student_id in &req.student_ids {
        let detail = match enroll(db, &group, student_id).await {
            Ok(Ok(created)) => {
                report.created += 1;
                BulkDetail {
                    student_id,
                    success: true,
                    message: "Enrolled".into(),
                    enrollment_id: Some(created.id),
                }
            }
            Ok(Err(rejection)) => {
                report.failed += 1;
                BulkDetail {
                    student_id,
                    success: false,
                    message: rejection.message().into(),
                    enrollment_id: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, student_id, group_id = group.id, "Bulk enrollment failed");
                report.failed += 1;
                BulkDetail {
                    student_id,
                    success: false,
                    message: "Database error".into(),
                    enrollment_id: None,
                }
            }
        };
        report.details.push(detail);
    }

    audit(
        db,
        AuditEntry::new("bulk_create", "enrollment")
            .by(auth.id())
            .on(group.id)
            .with_payload(&req)
            .from_ip(ip),
    )
    .await;

    let message = format!(
        "{} students enrolled, {} failed",
        report.created, report.failed
    );
    (StatusCode::OK, Json(ApiResponse::success(report, message))).into_response()
}
