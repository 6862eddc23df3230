use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::user::Model as UserModel;
use util::state::AppState;

use super::common::CreateUserRequest;
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, is_unique_violation, validate};

/// POST /api/users
///
/// Create a user with any role. Admin only.
///
/// ### Request Body
/// ```json
/// {
///   "username": "jdoe",
///   "email": "jdoe@example.com",
///   "password": "secret1",
///   "full_name": "Jane Doe",
///   "role": "teacher",
///   "status": "active"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new user
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (username or email already taken)
pub async fn create_user(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match UserModel::identity_taken(db, &req.username, &req.email).await {
        Ok(true) => {
            return error_response(
                StatusCode::CONFLICT,
                "A user with this username or email already exists",
            );
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check user identity", e),
    }

    let created = UserModel::create(
        db,
        &req.username,
        &req.email,
        &req.password,
        &req.full_name,
        req.role,
        req.status.unwrap_or_default(),
    )
    .await;

    match created {
        Ok(user) => {
            audit(
                db,
                AuditEntry::new("create", "user")
                    .by(auth.id())
                    .on(user.id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(user, "User created successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            "A user with this username or email already exists",
        ),
        Err(e) => db_error("Failed to create user", e),
    }
}
