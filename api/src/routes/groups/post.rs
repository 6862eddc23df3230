use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::group;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use util::state::AppState;

use super::common::{CreateGroupRequest, course_exists, teacher_exists};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found, validate};

/// POST /api/groups
///
/// ### Request Body
/// ```json
/// {
///   "course_id": 1,
///   "name": "A",
///   "academic_year": 2025,
///   "teacher_id": 3,
///   "max_capacity": 30,
///   "classroom": "B-204",
///   "shift": "morning"
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
/// - `404 Not Found` (course or teacher)
pub async fn create_group(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateGroupRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match course_exists(db, req.course_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    }
    match teacher_exists(db, req.teacher_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    let now = Utc::now();
    let created = group::ActiveModel {
        course_id: Set(req.course_id),
        name: Set(req.name.trim().to_owned()),
        academic_year: Set(req.academic_year),
        teacher_id: Set(req.teacher_id),
        max_capacity: Set(req.max_capacity),
        classroom: Set(req.classroom.clone()),
        shift: Set(req.shift),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(group) => {
            audit(
                db,
                AuditEntry::new("create", "group")
                    .by(auth.id())
                    .on(group.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(group, "Group created successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to create group", e),
    }
}
