use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::timetable_entry;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/timetables/{entry_id}
///
/// Sessions already generated from the entry are kept.
pub async fn delete_timetable_entry(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(entry_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match timetable_entry::Entity::delete_by_id(entry_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Timetable entry"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "timetable_entry")
                    .by(auth.id())
                    .on(entry_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Timetable entry deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete timetable entry", e),
    }
}
