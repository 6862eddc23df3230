use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record;
use db::models::audit_log::AuditEntry;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/attendance/{attendance_id}
pub async fn delete_attendance(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(attendance_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match attendance_record::Entity::delete_by_id(attendance_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Attendance record"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "attendance")
                    .by(auth.id())
                    .on(attendance_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Attendance record deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete attendance record", e),
    }
}
