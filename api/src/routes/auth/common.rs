use axum::http::{HeaderMap, header::USER_AGENT};
use axum::response::Response;
use chrono::Duration;
use db::models::auth_token::{self, IssueContext, generate_refresh_token};
use db::models::user;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use util::config;

use crate::auth::generate_jwt;
use crate::routes::common::{db_error, error_response};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub expires_at: String,
    pub user: user::Model,
}

pub fn issue_context(ip: &str, headers: &HeaderMap) -> IssueContext {
    IssueContext {
        ip_address: Some(ip.to_owned()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

/// Signs a new access token, generates a refresh token and stores both digests.
pub async fn issue_tokens(
    db: &DatabaseConnection,
    account: user::Model,
    ctx: IssueContext,
) -> Result<TokenResponse, Response> {
    let (access_token, expires_at) = generate_jwt(account.id, account.role).map_err(|e| {
        tracing::error!(error = %e, user_id = account.id, "Token encoding failed");
        error_response(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to issue token",
        )
    })?;
    let refresh_token = generate_refresh_token();

    let access_minutes = config::jwt_duration_minutes() as i64;
    auth_token::Model::store(
        db,
        account.id,
        &access_token,
        &refresh_token,
        Duration::minutes(access_minutes),
        Duration::minutes(config::refresh_duration_minutes() as i64),
        ctx,
    )
    .await
    .map_err(|e| db_error("Failed to store token", e))?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in: access_minutes * 60,
        expires_at: expires_at.to_rfc3339(),
        user: account,
    })
}
