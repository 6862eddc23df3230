use crate::auth::claims::AuthUser;
use crate::auth::decode_jwt;
use crate::auth::extractors::bearer_token;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use db::models::{auth_token, user};
use sea_orm::EntityTrait;
use util::state::AppState;

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

fn reject(status: StatusCode, message: &str) -> GuardError {
    (status, Json(ApiResponse::error(message)))
}

/// Verifies the bearer token against the token store and the user's status,
/// then inserts the `AuthUser` into the request extensions.
///
/// The role in the inserted claims is the user's current role, not the one
/// baked into the token at login.
async fn authenticate(
    app_state: &AppState,
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardError> {
    let (mut parts, body) = req.into_parts();
    let token = bearer_token(&mut parts, &())
        .await
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let mut claims = decode_jwt(&token)
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

    let db = app_state.db();
    match auth_token::Model::find_by_access_token(db, &token).await {
        Ok(Some(row)) if row.user_id == claims.sub && row.is_usable(Utc::now()) => {}
        Ok(_) => {
            return Err(reject(StatusCode::UNAUTHORIZED, "Token has been revoked or expired"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Token lookup failed");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    }

    let account = match user::Entity::find_by_id(claims.sub).one(db).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(reject(StatusCode::UNAUTHORIZED, "User not found")),
        Err(e) => {
            tracing::error!(error = %e, user_id = claims.sub, "User lookup failed");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };
    if !account.is_active() {
        return Err(reject(StatusCode::FORBIDDEN, "Account is not active"));
    }
    claims.role = account.role;

    let user = AuthUser(claims);
    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request carries a live token of an active user.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, _user) = authenticate(&app_state, req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, user) = authenticate(&app_state, req).await?;

    if !user.is_admin() {
        return Err(reject(StatusCode::FORBIDDEN, "Admin access required"));
    }

    Ok(next.run(req).await)
}
