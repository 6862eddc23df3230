use db::models::attendance_record;
use db::models::session::{self, SessionStatus};
use db::models::{course, group, student};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DUPLICATE_MESSAGE: &str = "A session already exists for this group at that date and time";

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateSessionRequest {
    pub group_id: i64,
    pub scheduled_date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateSessionRequest {
    pub scheduled_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.scheduled_date.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GenerateSessionsRequest {
    pub group_id: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionFilters {
    pub group_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<SessionStatus>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionAttendanceRow {
    #[serde(flatten)]
    pub record: attendance_record::Model,
    pub student: Option<student::Model>,
}

/// An actively enrolled student of the session's group with their record, if any.
#[derive(Debug, Serialize)]
pub struct SessionStudent {
    #[serde(flatten)]
    pub student: student::Model,
    pub full_name: Option<String>,
    pub attendance: Option<attendance_record::Model>,
}

#[derive(Debug, Serialize)]
pub struct SessionStats {
    pub session_id: i64,
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    /// `(present + late) / total * 100`, two decimals.
    pub attendance_percentage: f64,
    pub enrolled_students: u64,
    pub unrecorded: u64,
}

/// Message for a refused status change.
pub fn transition_refused(from: SessionStatus, to: SessionStatus) -> String {
    format!("Cannot change session status from {from} to {to}")
}

/// A session labelled with its group and course names.
#[derive(Debug, Serialize)]
pub struct SessionItem {
    #[serde(flatten)]
    pub session: session::Model,
    pub group_name: Option<String>,
    pub course_name: Option<String>,
}

/// Resolves group and course names for `sessions` with two lookups.
pub async fn with_names(
    db: &DatabaseConnection,
    sessions: Vec<session::Model>,
) -> Result<Vec<SessionItem>, DbErr> {
    let group_ids: Vec<i64> = sessions.iter().map(|s| s.group_id).collect();
    let course_ids: Vec<i64> = sessions.iter().map(|s| s.course_id).collect();

    let groups: HashMap<i64, String> = group::Entity::find()
        .filter(group::Column::Id.is_in(group_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();
    let courses: HashMap<i64, String> = course::Entity::find()
        .filter(course::Column::Id.is_in(course_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(sessions
        .into_iter()
        .map(|session| SessionItem {
            group_name: groups.get(&session.group_id).cloned(),
            course_name: courses.get(&session.course_id).cloned(),
            session,
        })
        .collect())
}
