use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::{student, user};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/students/{student_id}
///
/// Deletes the student's user account together with the profile, its
/// enrollments and its attendance records.
pub async fn delete_student(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(student_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    let existing = match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    };

    match user::Entity::delete_by_id(existing.user_id).exec(db).await {
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "student")
                    .by(auth.id())
                    .on(student_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Student deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete student", e),
    }
}
