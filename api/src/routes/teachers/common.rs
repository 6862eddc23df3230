use chrono::NaiveDate;
use db::models::{teacher, user};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20, message = "Teacher code must be between 1 and 20 characters"))]
    pub teacher_code: String,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub specialty: Option<String>,

    pub hired_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateTeacherRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Teacher code must be between 1 and 20 characters"))]
    pub teacher_code: Option<String>,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub specialty: Option<String>,

    pub hired_on: Option<NaiveDate>,
}

impl UpdateTeacherRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.teacher_code.is_none()
            && self.department.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.specialty.is_none()
            && self.hired_on.is_none()
    }
}

/// A timetable slot of one of the teacher's groups.
#[derive(Debug, Serialize)]
pub struct TeacherTimetableItem {
    #[serde(flatten)]
    pub item: crate::routes::timetables::common::TimetableItem,
    pub group_name: String,
    pub course_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeacherStats {
    pub teacher_id: i64,
    pub groups: u64,
    /// Active enrollments across the teacher's groups.
    pub active_students: u64,
    pub sessions: u64,
}

#[derive(Debug, Deserialize)]
pub struct TeacherFilters {
    pub department: Option<String>,
}

/// A teacher profile with its user account.
#[derive(Debug, Serialize)]
pub struct TeacherResponse {
    #[serde(flatten)]
    pub teacher: teacher::Model,
    pub user: Option<user::Model>,
}

/// Loads the user rows for `teachers` in one query.
pub async fn with_users(
    db: &DatabaseConnection,
    teachers: Vec<teacher::Model>,
) -> Result<Vec<TeacherResponse>, DbErr> {
    let ids: Vec<i64> = teachers.iter().map(|t| t.user_id).collect();
    let mut users: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(teachers
        .into_iter()
        .map(|teacher| {
            let user = users.remove(&teacher.user_id);
            TeacherResponse { teacher, user }
        })
        .collect())
}
