use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::{teacher, user};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/teachers/{teacher_id}
///
/// Deletes the teacher's user account; the profile goes with it and the
/// teacher's groups are left without a teacher.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn delete_teacher(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(teacher_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    let existing = match teacher::Entity::find_by_id(teacher_id).one(db).await {
        Ok(Some(t)) => t,
        Ok(None) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    };

    match user::Entity::delete_by_id(existing.user_id).exec(db).await {
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "teacher")
                    .by(auth.id())
                    .on(teacher_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Teacher deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete teacher", e),
    }
}
