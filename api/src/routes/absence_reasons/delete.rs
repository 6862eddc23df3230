use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::absence_reason;
use db::models::audit_log::AuditEntry;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/absence-reasons/{reason_id}
///
/// Records that referenced the reason keep their status and lose the link.
pub async fn delete_absence_reason(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(reason_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match absence_reason::Entity::delete_by_id(reason_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Absence reason"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "absence_reason")
                    .by(auth.id())
                    .on(reason_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Absence reason deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete absence reason", e),
    }
}
