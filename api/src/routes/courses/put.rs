use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::course;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::UpdateCourseRequest;
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// PUT /api/courses/{course_id}
///
/// Partial update. An empty body is rejected with `400 "No data to update"`.
///
/// ### Responses
/// - `200 OK` with the updated course
/// - `404 Not Found`
/// - `409 Conflict` (code already used)
pub async fn update_course(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(course_id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match course::Entity::find_by_id(course_id).one(db).await {
        Ok(Some(c)) => c,
        Ok(None) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    };

    let payload = serde_json::to_value(&req).unwrap_or_default();
    let mut active: course::ActiveModel = existing.into();
    if let Some(code) = req.code {
        active.code = Set(code.trim().to_uppercase());
    }
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "course")
                    .by(auth.id())
                    .on(course_id)
                    .with_payload(&payload)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Course updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::CONFLICT, "A course with this code already exists")
        }
        Err(e) => db_error("Failed to update course", e),
    }
}
