use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::user::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde_json::json;
use util::state::AppState;

use super::common::{ChangePasswordRequest, ChangeStatusRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found, validate};

/// PATCH /api/users/{user_id}/status
///
/// Sets the lifecycle status. Inactive and suspended users can no longer log in
/// and their outstanding tokens stop passing the guard.
///
/// ### Request Body
/// ```json
/// { "status": "suspended" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `404 Not Found`
pub async fn change_user_status(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    Json(req): Json<ChangeStatusRequest>,
) -> Response {
    let db = app_state.db();
    let existing = match UserEntity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => return not_found("User"),
        Err(e) => return db_error("Failed to load user", e),
    };
    let previous = existing.status;

    let mut active: UserActiveModel = existing.into();
    active.status = Set(req.status);
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("status_change", "user")
                    .by(auth.id())
                    .on(user_id)
                    .with_payload(&json!({ "from": previous, "to": req.status }))
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "User status updated successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to update user status", e),
    }
}

/// PATCH /api/users/{user_id}/password
///
/// Replaces the password after checking the current one.
///
/// ### Request Body
/// ```json
/// { "current_password": "secret1", "new_password": "secret22" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (validation failure)
/// - `401 Unauthorized` (current password does not match)
/// - `404 Not Found`
pub async fn change_user_password(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match UserEntity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => return not_found("User"),
        Err(e) => return db_error("Failed to load user", e),
    };
    if !existing.verify_password(&req.current_password) {
        return error_response(StatusCode::UNAUTHORIZED, "Current password is incorrect");
    }

    let hash = match user::hash_password(&req.new_password) {
        Ok(hash) => hash,
        Err(e) => return db_error("Failed to hash password", e),
    };
    let mut active: UserActiveModel = existing.into();
    active.password_hash = Set(hash);
    active.updated_at = Set(Utc::now());

    if let Err(e) = active.update(db).await {
        return db_error("Failed to update password", e);
    }

    audit(
        db,
        AuditEntry::new("password_change", "user")
            .by(auth.id())
            .on(user_id)
            .from_ip(ip),
    )
    .await;

    (
        StatusCode::OK,
        Json(ApiResponse::<()>::success((), "Password updated successfully")),
    )
        .into_response()
}
