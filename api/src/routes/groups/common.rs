use db::models::attendance_record::AttendanceTally;
use db::models::enrollment::Capacity;
use db::models::group::Shift;
use db::models::session::SessionTally;
use db::models::{course, group, teacher};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateGroupRequest {
    pub course_id: i64,

    #[validate(length(min = 1, max = 50, message = "Group name must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(range(min = 2000, max = 2100, message = "Academic year must be between 2000 and 2100"))]
    pub academic_year: i32,

    pub teacher_id: Option<i64>,

    #[validate(range(min = 1, message = "Max capacity must be positive"))]
    pub max_capacity: Option<i32>,

    #[validate(length(max = 50))]
    pub classroom: Option<String>,

    pub shift: Option<Shift>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateGroupRequest {
    pub course_id: Option<i64>,

    #[validate(length(min = 1, max = 50, message = "Group name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 2000, max = 2100, message = "Academic year must be between 2000 and 2100"))]
    pub academic_year: Option<i32>,

    #[validate(range(min = 1, message = "Max capacity must be positive"))]
    pub max_capacity: Option<i32>,

    #[validate(length(max = 50))]
    pub classroom: Option<String>,

    pub shift: Option<Shift>,
}

impl UpdateGroupRequest {
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none()
            && self.name.is_none()
            && self.academic_year.is_none()
            && self.max_capacity.is_none()
            && self.classroom.is_none()
            && self.shift.is_none()
    }
}

/// Body of `PUT /groups/{id}/teacher`; `null` unassigns.
#[derive(Debug, Deserialize, Serialize)]
pub struct AssignTeacherRequest {
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GroupFilters {
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub academic_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct GroupSessionFilters {
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<db::models::session::SessionStatus>,
}

#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: group::Model,
    pub course: Option<course::Model>,
    pub teacher: Option<teacher::Model>,
}

#[derive(Debug, Serialize)]
pub struct GroupStats {
    pub group_id: i64,
    pub capacity: Capacity,
    pub timetable_entries: u64,
    pub sessions: SessionTally,
    pub attendance: AttendanceTally,
}

/// `Ok(false)` when `teacher_id` is set but unknown.
pub async fn teacher_exists(db: &DatabaseConnection, teacher_id: Option<i64>) -> Result<bool, DbErr> {
    match teacher_id {
        Some(id) => Ok(teacher::Entity::find_by_id(id).one(db).await?.is_some()),
        None => Ok(true),
    }
}

pub async fn course_exists(db: &DatabaseConnection, course_id: i64) -> Result<bool, DbErr> {
    Ok(course::Entity::find_by_id(course_id).one(db).await?.is_some())
}
