use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::student::{self, NewStudent};
use db::models::user;
use util::state::AppState;

use super::common::{CreateStudentRequest, StudentResponse};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, is_unique_violation, validate};

/// POST /api/students
///
/// Creates the `student` user account and its profile in one transaction.
///
/// ### Request Body
/// ```json
/// {
///   "username": "lgomez",
///   "email": "lgomez@example.com",
///   "password": "secret1",
///   "full_name": "Luis Gomez",
///   "student_code": "S-2025-001",
///   "birth_date": "2007-04-12",
///   "gender": "M"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the profile and its user
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (username, email or student code already taken)
pub async fn create_student(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateStudentRequest>,
) -> Response {
    if let Err(resp) = validate(&req) {
        return resp;
    }
    let db = app_state.db();

    match user::Model::identity_taken(db, &req.username, &req.email).await {
        Ok(true) => {
            return error_response(
                StatusCode::CONFLICT,
                "A user with this username or email already exists",
            );
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check user identity", e),
    }
    match student::Model::code_taken(db, &req.student_code).await {
        Ok(true) => {
            return error_response(StatusCode::CONFLICT, "Student code already exists");
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check student code", e),
    }

    let new = NewStudent {
        username: req.username,
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        student_code: req.student_code,
        birth_date: req.birth_date,
        gender: req.gender,
    };

    match student::Model::create_with_user(db, new).await {
        Ok((user, student)) => {
            audit(
                db,
                AuditEntry::new("create", "student")
                    .by(auth.id())
                    .on(student.id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    StudentResponse {
                        student,
                        user: Some(user),
                    },
                    "Student created successfully",
                )),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::CONFLICT, "Student already exists")
        }
        Err(e) => db_error("Failed to create student", e),
    }
}
