use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::session;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/sessions/{session_id}
///
/// Deletes the session and its attendance records.
pub async fn delete_session(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(session_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match session::Entity::delete_by_id(session_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Session"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "session")
                    .by(auth.id())
                    .on(session_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Session deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete session", e),
    }
}
