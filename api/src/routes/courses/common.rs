use db::models::attendance_record::AttendanceTally;
use db::models::enrollment::EnrollmentStatus;
use db::models::student;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 2, max = 20, message = "Code must be between 2 and 20 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 2, max = 20, message = "Code must be between 2 and 20 characters"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl UpdateCourseRequest {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct CourseStats {
    pub course_id: i64,
    pub groups: u64,
    pub sessions: u64,
    pub enrolled_students: u64,
    pub attendance: AttendanceTally,
}

/// An actively enrolled student of one of the course's groups.
#[derive(Debug, Serialize)]
pub struct CourseStudent {
    #[serde(flatten)]
    pub student: student::Model,
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub group_id: i64,
    pub group_name: String,
    pub enrollment_status: EnrollmentStatus,
}
