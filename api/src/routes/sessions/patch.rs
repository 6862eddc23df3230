use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::session::{self, SessionStatus};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use util::state::AppState;

use super::common::{UpdateSessionStatusRequest, transition_refused};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, not_found};

#[derive(Serialize)]
struct StatusChange {
    from: SessionStatus,
    to: SessionStatus,
}

async fn transition(
    db: &DatabaseConnection,
    auth: &AuthUser,
    ip: String,
    session_id: i64,
    next: SessionStatus,
) -> Response {
    let existing = match session::Entity::find_by_id(session_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Session"),
        Err(e) => return db_error("Failed to load session", e),
    };
    let from = existing.status;

    match existing.transition(db, next).await {
        Ok(Some(updated)) => {
            audit(
                db,
                AuditEntry::new("update_status", "session")
                    .by(auth.id())
                    .on(session_id)
                    .with_payload(&StatusChange { from, to: next })
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, format!("Session marked as {next}"))),
            )
                .into_response()
        }
        Ok(None) => error_response(StatusCode::CONFLICT, transition_refused(from, next)),
        Err(e) => db_error("Failed to update session status", e),
    }
}

/// PATCH /api/sessions/{session_id}/status
///
/// ### Request Body
/// ```json
/// { "status": "held" }
/// ```
///
/// Allowed moves: `planned → held`, `planned → cancelled`.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
/// - `409 Conflict` (transition not allowed)
pub async fn update_session_status(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(session_id): Path<i64>,
    Json(req): Json<UpdateSessionStatusRequest>,
) -> Response {
    transition(app_state.db(), &auth, ip, session_id, req.status).await
}

/// POST /api/sessions/{session_id}/start
///
/// Marks a planned session as held.
pub async fn start_session(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(session_id): Path<i64>,
) -> Response {
    transition(app_state.db(), &auth, ip, session_id, SessionStatus::Held).await
}

/// POST /api/sessions/{session_id}/cancel
pub async fn cancel_session(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(session_id): Path<i64>,
) -> Response {
    transition(app_state.db(), &auth, ip, session_id, SessionStatus::Cancelled).await
}
