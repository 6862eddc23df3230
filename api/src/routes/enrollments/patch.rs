use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::group;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{EnrollRejection, UpdateEnrollmentStatusRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found};

/// PATCH /api/enrollments/{enrollment_id}/status
///
/// Reactivating an enrollment is subject to the group's capacity.
///
/// ### Request Body
/// ```json
/// { "status": "graduated" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
/// - `409 Conflict` (reactivation into a full group)
pub async fn update_enrollment_status(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<UpdateEnrollmentStatusRequest>,
) -> Response {
    let db = app_state.db();

    let existing = match enrollment::Entity::find_by_id(enrollment_id).one(db).await {
        Ok(Some(e)) => e,
        Ok(None) => return not_found("Enrollment"),
        Err(e) => return db_error("Failed to load enrollment", e),
    };

    if req.status == EnrollmentStatus::Active && existing.status != EnrollmentStatus::Active {
        let group = match group::Entity::find_by_id(existing.group_id).one(db).await {
            Ok(Some(g)) => g,
            Ok(None) => return not_found("Group"),
            Err(e) => return db_error("Failed to load group", e),
        };
        match enrollment::Model::capacity(db, &group).await {
            Ok(c) if c.full => {
                return error_response(
                    StatusCode::CONFLICT,
                    EnrollRejection::GroupFull.message(),
                );
            }
            Ok(_) => {}
            Err(e) => return db_error("Failed to compute capacity", e),
        }
    }

    let mut active: enrollment::ActiveModel = existing.into();
    active.status = Set(req.status);
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update_status", "enrollment")
                    .by(auth.id())
                    .on(enrollment_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    updated,
                    "Enrollment status updated successfully",
                )),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to update enrollment", e),
    }
}
