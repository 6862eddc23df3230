use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use db::models::audit_log::AuditEntry;
use db::models::{student, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, TransactionTrait,
};
use util::state::AppState;

use super::common::{StudentResponse, UpdateStudentRequest};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{
    audit, db_error, error_response, is_unique_violation, not_found, validate,
};

/// PUT /api/students/{student_id}
///
/// Partially updates the profile; `full_name` and `email` go to the linked user.
///
/// ### Responses
/// - `200 OK` with the updated profile and user
/// - `400 Bad Request` (validation failure or empty body)
/// - `404 Not Found`
/// - `409 Conflict` (email or student code already taken)
pub async fn update_student(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> Response {
    if req.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No data to update");
    }
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    let existing = match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    };

    match apply_update(db, existing, req.clone()).await {
        Ok(updated) => {
            audit(
                db,
                AuditEntry::new("update", "student")
                    .by(auth.id())
                    .on(student_id)
                    .with_payload(&req)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(updated, "Student updated successfully")),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => error_response(
            StatusCode::CONFLICT,
            "Email or student code already in use",
        ),
        Err(e) => db_error("Failed to update student", e),
    }
}

async fn apply_update(
    db: &DatabaseConnection,
    existing: student::Model,
    req: UpdateStudentRequest,
) -> Result<StudentResponse, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();
    let user_id = existing.user_id;

    let mut profile: student::ActiveModel = existing.into();
    if let Some(code) = req.student_code {
        profile.student_code = Set(code);
    }
    if let Some(birth_date) = req.birth_date {
        profile.birth_date = Set(Some(birth_date));
    }
    if let Some(gender) = req.gender {
        profile.gender = Set(Some(gender));
    }
    profile.updated_at = Set(now);
    let student = profile.update(&txn).await?;

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
    Ok(StudentResponse {
        student,
        user: account,
    })
}
