use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::TypedHeader;
use db::models::audit_log::AuditEntry;
use db::models::{auth_token, user};
use headers::{Authorization, authorization::Bearer};
use sea_orm::EntityTrait;
use serde::Deserialize;
use std::time::Duration;
use util::{config, state::AppState};
use validator::Validate;

use super::common::{issue_context, issue_tokens};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, validate};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 12, message = "Password must be between 6 and 12 characters"))]
    pub password: String,
}

/// POST /api/auth/login
///
/// Authenticate with email and password and receive an access/refresh token pair.
///
/// ### Request Body
/// ```json
/// { "email": "admin@example.com", "password": "secret1" }
/// ```
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "access_token": "eyJ...",
///     "refresh_token": "Q3x...",
///     "token_type": "Bearer",
///     "expires_in": 86400,
///     "expires_at": "2025-05-23T12:00:00+00:00",
///     "user": { "id": 1, "username": "admin", "role": "admin", "status": "active", ... }
///   },
///   "message": "Login successful"
/// }
/// ```
///
/// - `400 Bad Request` (validation failure)
/// - `401 Unauthorized` (unknown email or wrong password)
/// - `403 Forbidden` (inactive or suspended account)
/// - `429 Too Many Requests` (too many failed attempts from this address)
pub async fn login(
    State(app_state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }

    let throttle = app_state.login_throttle();
    let window = Duration::from_secs(config::login_window_minutes() * 60);
    if throttle.is_blocked(&ip, config::login_max_attempts(), window) {
        tracing::warn!(%ip, "Login throttled");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many failed login attempts, try again later",
        );
    }

    let db = app_state.db();
    let account = match user::Model::find_by_email(db, &req.email).await {
        Ok(Some(account)) if account.verify_password(&req.password) => account,
        Ok(_) => {
            throttle.record_failure(&ip, window);
            return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => return db_error("Login lookup failed", e),
    };

    if !account.is_active() {
        return error_response(StatusCode::FORBIDDEN, "Account is not active");
    }
    throttle.clear(&ip);

    let user_id = account.id;
    let tokens = match issue_tokens(db, account, issue_context(&ip, &headers)).await {
        Ok(tokens) => tokens,
        Err(resp) => return resp,
    };

    audit(
        db,
        AuditEntry::new("login", "user")
            .by(user_id)
            .on(user_id)
            .from_ip(ip),
    )
    .await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(tokens, "Login successful")),
    )
        .into_response()
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new token pair. The old pair is revoked.
///
/// ### Responses
/// - `200 OK` with the same payload as `login`
/// - `401 Unauthorized` if the refresh token is unknown, revoked or expired
/// - `403 Forbidden` if the account is no longer active
pub async fn refresh(
    State(app_state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let row = match auth_token::Model::find_valid_refresh(db, &req.refresh_token).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid or expired refresh token");
        }
        Err(e) => return db_error("Refresh lookup failed", e),
    };

    let account = match user::Entity::find_by_id(row.user_id).one(db).await {
        Ok(Some(account)) => account,
        Ok(None) => return error_response(StatusCode::UNAUTHORIZED, "User not found"),
        Err(e) => return db_error("User lookup failed", e),
    };
    if !account.is_active() {
        return error_response(StatusCode::FORBIDDEN, "Account is not active");
    }

    if let Err(e) = row.revoke(db).await {
        return db_error("Failed to revoke refreshed token", e);
    }

    match issue_tokens(db, account, issue_context(&ip, &headers)).await {
        Ok(tokens) => (
            StatusCode::OK,
            Json(ApiResponse::success(tokens, "Token refreshed successfully")),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/auth/logout
///
/// Revokes the access token used for this request. Later requests with it get `401`.
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Response {
    let db = app_state.db();

    match auth_token::Model::find_by_access_token(db, bearer.token()).await {
        Ok(Some(row)) => {
            if let Err(e) = row.revoke(db).await {
                return db_error("Failed to revoke token", e);
            }
        }
        Ok(None) => {}
        Err(e) => return db_error("Token lookup failed", e),
    }

    audit(
        db,
        AuditEntry::new("logout", "user")
            .by(user.id())
            .on(user.id())
            .from_ip(ip),
    )
    .await;

    (
        StatusCode::OK,
        Json(ApiResponse::<()>::success((), "Logged out successfully")),
    )
        .into_response()
}
