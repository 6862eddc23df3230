use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::absence_reason;
use db::models::audit_log::AuditEntry;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use util::state::AppState;

use super::common::{CreateAbsenceReasonRequest, DUPLICATE_MESSAGE};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, is_unique_violation, validate};

/// POST /api/absence-reasons
///
/// ### Request Body
/// ```json
/// { "code": "MED", "description": "Medical appointment" }
/// ```
///
/// Codes are stored uppercase.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (code already used)
pub async fn create_absence_reason(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateAbsenceReasonRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match absence_reason::Model::find_by_code(db, &req.code).await {
        Ok(Some(_)) => return error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Ok(None) => {}
        Err(e) => return db_error("Failed to check absence reason code", e),
    }

    let now = Utc::now();
    let created = absence_reason::ActiveModel {
        code: Set(req.code.trim().to_uppercase()),
        description: Set(req.description.trim().to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(reason) => {
            audit(
                db,
                AuditEntry::new("create", "absence_reason")
                    .by(auth.id())
                    .on(reason.id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(reason, "Absence reason created successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Err(e) => db_error("Failed to create absence reason", e),
    }
}
