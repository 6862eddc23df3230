use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::absence_reason;
use db::models::audit_log::AuditEntry;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use super::common::{DUPLICATE_MESSAGE, UpdateAbsenceReasonRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// PUT /api/absence-reasons/{reason_id}
pub async fn update_absence_reason(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(reason_id): Path<i64>,
    Json(req): Json<UpdateAbsenceReasonRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match absence_reason::Entity::find_by_id(reason_id).one(db).await {
        Ok(Some(r)) => r,
        Ok(None) => return not_found("Absence reason"),
        Err(e) => return db_error("Failed to load absence reason", e),
    };

    let mut active: absence_reason::ActiveModel = existing.into();
    if let Some(code) = &req.code {
        active.code = Set(code.trim().to_uppercase());
    }
    if let Some(description) = &req.description {
        active.description = Set(description.trim().to_owned());
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "absence_reason")
                    .by(auth.id())
                    .on(reason_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Absence reason updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE),
        Err(e) => db_error("Failed to update absence reason", e),
    }
}
