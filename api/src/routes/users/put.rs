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
use util::state::AppState;

use super::common::UpdateUserRequest;
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// PUT /api/users/{user_id}
///
/// Partially update a user. Only the provided fields change; a new `password`
/// is re-hashed.
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request` (validation failure or empty body)
/// - `404 Not Found`
/// - `409 Conflict` (username or email already taken)
pub async fn update_user(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match UserEntity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => return not_found("User"),
        Err(e) => return db_error("Failed to load user", e),
    };

    let mut active: UserActiveModel = existing.into();
    if let Some(username) = req.username {
        active.username = Set(username);
    }
    if let Some(email) = req.email {
        active.email = Set(email.to_lowercase());
    }
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(role) = req.role {
        active.role = Set(role);
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    if let Some(password) = req.password {
        match user::hash_password(&password) {
            Ok(hash) => active.password_hash = Set(hash),
            Err(e) => return db_error("Failed to hash password", e),
        }
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "user")
                    .by(auth.id())
                    .on(user_id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "User updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            "A user with this username or email already exists",
        ),
        Err(e) => db_error("Failed to update user", e),
    }
}
