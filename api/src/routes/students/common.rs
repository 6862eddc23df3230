use chrono::NaiveDate;
use db::models::student::{self, Gender};
use db::models::{enrollment, group, user};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20, message = "Student code must be between 1 and 20 characters"))]
    pub student_code: String,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Student code must be between 1 and 20 characters"))]
    pub student_code: Option<String>,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl UpdateStudentRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.student_code.is_none()
            && self.birth_date.is_none()
            && self.gender.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct StudentFilters {
    pub gender: Option<Gender>,
    pub group_id: Option<i64>,
}

/// Filters for `GET /students/{id}/attendance`.
#[derive(Debug, Deserialize)]
pub struct StudentAttendanceFilters {
    pub from: Option<String>,
    pub to: Option<String>,
    pub group_id: Option<i64>,
    pub status: Option<db::models::attendance_record::AttendanceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StudentStatsQuery {
    pub group_id: Option<i64>,
}

/// A student profile with its user account.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    #[serde(flatten)]
    pub student: student::Model,
    pub user: Option<user::Model>,
}

#[derive(Debug, Serialize)]
pub struct StudentEnrollment {
    #[serde(flatten)]
    pub enrollment: enrollment::Model,
    pub group: Option<group::Model>,
}

pub async fn with_users(
    db: &DatabaseConnection,
    students: Vec<student::Model>,
) -> Result<Vec<StudentResponse>, DbErr> {
    let ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
    let mut users: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(students
        .into_iter()
        .map(|student| {
            let user = users.remove(&student.user_id);
            StudentResponse { student, user }
        })
        .collect())
}
