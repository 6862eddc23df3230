use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::group;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, not_found};

/// DELETE /api/groups/{group_id}
///
/// Removes the group with its timetable, sessions and enrollments.
pub async fn delete_group(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();

    match group::Entity::delete_by_id(group_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Group"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "group")
                    .by(auth.id())
                    .on(group_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "Group deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete group", e),
    }
}
