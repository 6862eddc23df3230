use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::course;
use util::state::AppState;

use super::common::CreateCourseRequest;
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, is_unique_violation, validate};

/// POST /api/courses
///
/// ### Request Body
/// ```json
/// { "code": "MATH101", "name": "Mathematics I", "description": "Calculus and algebra" }
/// ```
///
/// Codes are stored uppercase.
///
/// ### Responses
/// - `201 Created` with the course
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (code already used)
pub async fn create_course(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateCourseRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match course::Model::find_by_code(db, &req.code).await {
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "A course with this code already exists");
        }
        Ok(None) => {}
        Err(e) => return db_error("Failed to check course code", e),
    }

    match course::Model::create(db, &req.code, &req.name, req.description.as_deref()).await {
        Ok(created) => {
            audit(
                db,
                AuditEntry::new("create", "course")
                    .by(auth.id())
                    .on(created.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(created, "Course created successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::CONFLICT, "A course with this code already exists")
        }
        Err(e) => db_error("Failed to create course", e),
    }
}
