use axum::{http::StatusCode, response::Response};
use db::models::status::LifecycleStatus;
use db::models::timetable_entry;
use db::scheduling::{ConflictChecker, SeaOrmSchedulingRepository, SlotError, SlotQuery, TimeSlot};
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::common::error_response;

pub const CONFLICT_MESSAGE: &str = "The group already has a timetable entry at that day and time";

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTimetableRequest {
    pub group_id: i64,

    #[validate(range(min = 1, max = 7, message = "Weekday must be between 1 (Monday) and 7 (Sunday)"))]
    pub weekday: i32,

    pub start_time: String,
    pub end_time: String,

    #[validate(length(max = 120, message = "Location must be at most 120 characters"))]
    pub location: Option<String>,

    pub status: Option<LifecycleStatus>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateTimetableRequest {
    #[validate(range(min = 1, max = 7, message = "Weekday must be between 1 (Monday) and 7 (Sunday)"))]
    pub weekday: Option<i32>,

    pub start_time: Option<String>,
    pub end_time: Option<String>,

    #[validate(length(max = 120, message = "Location must be at most 120 characters"))]
    pub location: Option<String>,

    pub status: Option<LifecycleStatus>,
}

impl UpdateTimetableRequest {
    pub fn is_empty(&self) -> bool {
        self.weekday.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ValidateConflictRequest {
    pub group_id: i64,

    #[validate(range(min = 1, max = 7, message = "Weekday must be between 1 (Monday) and 7 (Sunday)"))]
    pub weekday: i32,

    pub start_time: String,
    pub end_time: String,
    pub exclude_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub conflicting_entry: Option<TimetableItem>,
}

#[derive(Debug, Deserialize)]
pub struct TimetableFilters {
    pub group_id: Option<i64>,
    pub course_id: Option<i64>,
    pub weekday: Option<i32>,
    pub status: Option<LifecycleStatus>,
}

/// A timetable entry with its weekday spelled out.
#[derive(Debug, Serialize)]
pub struct TimetableItem {
    #[serde(flatten)]
    pub entry: timetable_entry::Model,
    pub weekday_name: &'static str,
}

impl From<timetable_entry::Model> for TimetableItem {
    fn from(entry: timetable_entry::Model) -> Self {
        let weekday_name = entry.weekday_name();
        Self {
            entry,
            weekday_name,
        }
    }
}

pub fn slot_error(err: SlotError) -> Response {
    error_response(StatusCode::BAD_REQUEST, err.to_string())
}

/// Runs the conflict check against the stored timetable.
pub async fn find_conflict(
    db: &DatabaseConnection,
    group_id: i64,
    weekday: i32,
    slot: TimeSlot,
    exclude_id: Option<i64>,
) -> Result<Option<timetable_entry::Model>, DbErr> {
    let repo = SeaOrmSchedulingRepository::new(db.clone());
    ConflictChecker::new(&repo)
        .find_conflict(&SlotQuery {
            group_id,
            weekday,
            slot,
            exclude_id,
        })
        .await
}
