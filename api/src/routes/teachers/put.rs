use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::{teacher, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, TransactionTrait,
};
use util::state::AppState;

use super::common::{TeacherResponse, UpdateTeacherRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// PUT /api/teachers/{teacher_id}
///
/// Partially updates the profile. `full_name` and `email` are written to the
/// linked user account in the same transaction.
///
/// ### Responses
/// - `200 OK` with the updated profile and user
/// - `400 Bad Request` (validation failure or empty body)
/// - `404 Not Found`
/// - `409 Conflict` (email or teacher code already taken)
pub async fn update_teacher(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(teacher_id): Path<i64>,
    Json(req): Json<UpdateTeacherRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match teacher::Entity::find_by_id(teacher_id).one(db).await {
        Ok(Some(t)) => t,
        Ok(None) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    };

    match apply_update(db, existing, req.clone()).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "teacher")
                    .by(auth.id())
                    .on(teacher_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Teacher updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            "Email or teacher code already in use",
        ),
        Err(e) => db_error("Failed to update teacher", e),
    }
}

async fn apply_update(
    db: &DatabaseConnection,
    existing: teacher::Model,
    req: UpdateTeacherRequest,
) -> Result<TeacherResponse, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();
    let user_id = existing.user_id;

    let mut profile: teacher::ActiveModel = existing.into();
    if let Some(code) = req.teacher_code {
        profile.teacher_code = Set(code);
    }
    if let Some(department) = req.department {
        profile.department = Set(Some(department));
    }
    if let Some(phone) = req.phone {
        profile.phone = Set(Some(phone));
    }
    if let Some(address) = req.address {
        profile.address = Set(Some(address));
    }
    if let Some(specialty) = req.specialty {
        profile.specialty = Set(Some(specialty));
    }
    if let Some(hired_on) = req.hired_on {
        profile.hired_on = Set(Some(hired_on));
    }
    profile.updated_at = Set(now);
    let teacher = profile.update(&txn).await?;

    let mut account = user::Entity::find_by_id(user_id).one(&txn).await?;
    if req.full_name.is_some() || req.email.is_some() {
        if let Some(found) = account.take() {
            let mut active: user::ActiveModel = found.into();
            if let Some(full_name) = req.full_name {
                active.full_name = Set(full_name);
            }
            if let Some(email) = req.email {
                active.email = Set(email.to_lowercase());
            }
            active.updated_at = Set(now);
            account = Some(active.update(&txn).await?);
        }
    }

    txn.commit().await?;
    Ok(TeacherResponse {
        teacher,
        user: account,
    })
}
