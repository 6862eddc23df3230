use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::course;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/courses/{course_id}
///
/// Deleting a course cascades to its groups, timetables and sessions.
pub async fn delete_course(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match course::Entity::delete_by_id(course_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Course"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "course")
                    .by(auth.id())
                    .on(course_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Course deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete course", e),
    }
}
