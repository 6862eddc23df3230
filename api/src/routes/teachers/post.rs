use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::audit_log::AuditEntry;
use db::models::teacher::{self, NewTeacher};
use db::models::user;
use util::state::AppState;

use super::common::{CreateTeacherRequest, TeacherResponse};
use crate::auth::{AuthUser, ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{audit, db_error, error_response, is_unique_violation, validate};

/// POST /api/teachers
///
/// Creates the `teacher` user account and its profile in one transaction.
///
/// ### Request Body
/// ```json
/// {
///   "username": "aperez",
///   "email": "aperez@example.com",
///   "password": "secret1",
///   "full_name": "Ana Perez",
///   "teacher_code": "T-001",
///   "department": "Mathematics"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the profile and its user
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (username, email or teacher code already taken)
pub async fn create_teacher(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateTeacherRequest>,
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
    match teacher::Model::code_taken(db, &req.teacher_code).await {
        Ok(true) => {
            return error_response(StatusCode::CONFLICT, "Teacher code already exists");
        }
        Ok(false) => {}
        Err(e) => return db_error("Failed to check teacher code", e),
    }

    let new = NewTeacher {
        username: req.username,
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        teacher_code: req.teacher_code,
        department: req.department,
        phone: req.phone,
        address: req.address,
        specialty: req.specialty,
        hired_on: req.hired_on,
    };

    match teacher::Model::create_with_user(db, new).await {
        Ok((user, teacher)) => {
            audit(
                db,
                AuditEntry::new("create", "teacher")
                    .by(auth.id())
                    .on(teacher.id)
                    .from_ip(ip),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    TeacherResponse {
                        teacher,
                        user: Some(user),
                    },
                    "Teacher created successfully",
                )),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::CONFLICT, "Teacher already exists")
        }
        Err(e) => db_error("Failed to create teacher", e),
    }
}
