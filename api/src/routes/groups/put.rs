use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::group;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{AssignTeacherRequest, UpdateGroupRequest, course_exists, teacher_exists};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, validate};

/// PUT /api/groups/{group_id}
///
/// Partially updates a group. The teacher is changed through
/// `PUT /groups/{group_id}/teacher`.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (validation failure or empty body)
/// - `404 Not Found` (group or new course)
pub async fn update_group(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(group_id): Path<i64>,
    Json(req): Json<UpdateGroupRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };
    if let Some(course_id) = req.course_id {
        match course_exists(db, course_id).await {
            Ok(true) => {}
            Ok(false) => return not_found("Course"),
            Err(e) => return db_error("Failed to load course", e),
        }
    }

    let mut active: group::ActiveModel = existing.into();
    if let Some(course_id) = req.course_id {
        active.course_id = Set(course_id);
    }
    if let Some(name) = &req.name {
        active.name = Set(name.trim().to_owned());
    }
    if let Some(year) = req.academic_year {
        active.academic_year = Set(year);
    }
    if let Some(capacity) = req.max_capacity {
        active.max_capacity = Set(Some(capacity));
    }
    if let Some(classroom) = &req.classroom {
        active.classroom = Set(Some(classroom.clone()));
    }
    if let Some(shift) = req.shift {
        active.shift = Set(Some(shift));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "group")
                    .by(auth.id())
                    .on(group_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Group updated successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to update group", e),
    }
}

/// PUT /api/groups/{group_id}/teacher
///
/// Assigns a teacher to the group, or unassigns with `{"teacher_id": null}`.
///
/// ### Responses
/// - `200 OK` with the updated group
/// - `404 Not Found` (group or teacher)
pub async fn assign_teacher(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(group_id): Path<i64>,
    Json(req): Json<AssignTeacherRequest>,
) -> Response {
    let db = app_state.db();

    let existing = match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };
    match teacher_exists(db, req.teacher_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    let mut active: group::ActiveModel = existing.into();
    active.teacher_id = Set(req.teacher_id);
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("assign_teacher", "group")
                    .by(auth.id())
                    .on(group_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            let message = if updated.teacher_id.is_some() {
                "Teacher assigned successfully"
            } else {
                "Teacher unassigned successfully"
            };
            (StatusCode::OK, Json(ApiResponse::success(updated, message))).into_response()
        }
        Err(e) => db_error("Failed to assign teacher", e),
    }
}
