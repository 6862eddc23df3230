use db::models::enrollment::{self, EnrollmentStatus};
use db::models::{group, student};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub group_id: i64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkEnrollRequest {
    pub group_id: i64,

    #[validate(length(min = 1, max = 500, message = "student_ids must contain between 1 and 500 ids"))]
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentFilters {
    pub student_id: Option<i64>,
    pub group_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

/// Outcome for one student of a bulk enrollment.
#[derive(Debug, Serialize)]
pub struct BulkDetail {
    pub student_id: i64,
    pub success: bool,
    pub message: String,
    pub enrollment_id: Option<i64>,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkEnrollReport {
    pub created: u32,
    pub failed: u32,
    pub details: Vec<BulkDetail>,
}

/// Why an enrollment cannot be created.
#[derive(Debug, PartialEq, Eq)]
pub enum EnrollRejection {
    StudentNotFound,
    AlreadyEnrolled,
    GroupFull,
}

impl EnrollRejection {
    pub fn message(&self) -> &'static str {
        match self {
            EnrollRejection::StudentNotFound => "Student not found",
            EnrollRejection::AlreadyEnrolled => "Student is already enrolled in this group",
            EnrollRejection::GroupFull => "Group has reached its maximum capacity",
        }
    }
}

/// Checks the student, duplicates and capacity, then inserts.
pub async fn enroll(
    db: &DatabaseConnection,
    group: &group::Model,
    student_id: i64,
) -> Result<Result<enrollment::Model, EnrollRejection>, DbErr> {
    if student::Entity::find_by_id(student_id).one(db).await?.is_none() {
        return Ok(Err(EnrollRejection::StudentNotFound));
    }
    if enrollment::Model::exists(db, student_id, group.id).await? {
        return Ok(Err(EnrollRejection::AlreadyEnrolled));
    }
    if enrollment::Model::capacity(db, group).await?.full {
        return Ok(Err(EnrollRejection::GroupFull));
    }
    enrollment::Model::create(db, student_id, group.id).await.map(Ok)
}
