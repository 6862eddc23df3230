use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{student, teacher, user};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{db_error, error_response};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: user::Model,
    pub teacher: Option<teacher::Model>,
    pub student: Option<student::Model>,
}

/// GET /api/auth/me
///
/// Returns the authenticated user together with their teacher or student
/// profile when one exists.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 2,
///     "username": "jdoe",
///     "email": "jdoe@example.com",
///     "full_name": "Jane Doe",
///     "role": "teacher",
///     "status": "active",
///     "teacher": { "id": 1, "teacher_code": "T-001", ... },
///     "student": null
///   },
///   "message": "User data retrieved successfully"
/// }
/// ```
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    let db = app_state.db();

    let account = match user::Entity::find_by_id(auth.id()).one(db).await {
        Ok(Some(account)) => account,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return db_error("Failed to load current user", e),
    };

    let teacher = teacher::Entity::find()
        .filter(teacher::Column::UserId.eq(account.id))
        .one(db)
        .await;
    let student = student::Entity::find()
        .filter(student::Column::UserId.eq(account.id))
        .one(db)
        .await;

    match (teacher, student) {
        (Ok(teacher), Ok(student)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                MeResponse {
                    user: account,
                    teacher,
                    student,
                },
                "User data retrieved successfully",
            )),
        )
            .into_response(),
        (Err(e), _) | (_, Err(e)) => db_error("Failed to load profile", e),
    }
}
