use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::enrollment;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/enrollments/{enrollment_id}
pub async fn delete_enrollment(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(enrollment_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match enrollment::Entity::delete_by_id(enrollment_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Enrollment"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "enrollment")
                    .by(auth.id())
                    .on(enrollment_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Enrollment deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete enrollment", e),
    }
}
