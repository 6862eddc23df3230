use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::user::Entity as UserEntity;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found};

/// DELETE /api/users/{user_id}
///
/// Deletes a user and, through cascades, their tokens and profile.
/// Admins cannot delete themselves.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (deleting own account)
/// - `404 Not Found`
pub async fn delete_user(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
) -> Response {
    if auth.id() == user_id {
        return error_response(StatusCode::BAD_REQUEST, "You cannot delete your own account");
    }
    let db = app_state.db();

    match UserEntity::delete_by_id(user_id).exec(db).await {
        Ok(res) if res.rows_affected == 0 => not_found("User"),
        Ok(_) => {
            audit(
                db,
                AuditEntry::new("delete", "user")
                    .by(auth.id())
                    .on(user_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::<()>::success((), "User deleted successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to delete user", e),
    }
}
