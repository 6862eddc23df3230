use chrono::{NaiveDate, NaiveTime, Utc};
use db::models::attendance_record::{self, AttendanceStatus, AttendanceTally};
use db::models::{absence_reason, session, student, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateAttendanceRequest {
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub absence_reason_id: Option<i64>,

    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub absence_reason_id: Option<i64>,

    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

impl UpdateAttendanceRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.absence_reason_id.is_none() && self.note.is_none()
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkRecord {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub absence_reason_id: Option<i64>,

    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkAttendanceRequest {
    pub session_id: i64,

    #[validate(
        length(min = 1, max = 500, message = "records must contain between 1 and 500 entries"),
        nested
    )]
    pub records: Vec<BulkRecord>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MarkRequest {
    pub session_id: i64,
    pub student_id: i64,

    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JustifyRequest {
    pub absence_reason_id: i64,

    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceFilters {
    pub session_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub group_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StudentStats {
    pub student_id: i64,
    pub group_id: Option<i64>,
    #[serde(flatten)]
    pub tally: AttendanceTally,
}

#[derive(Debug, Serialize)]
pub struct BulkDetail {
    pub student_id: i64,
    pub success: bool,
    /// `created`, `updated` or `failed`.
    pub action: &'static str,
    pub message: String,
    pub attendance_id: Option<i64>,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkAttendanceReport {
    pub created: u32,
    pub updated: u32,
    pub failed: u32,
    pub details: Vec<BulkDetail>,
}

/// A record with the session it belongs to.
#[derive(Debug, Serialize)]
pub struct AttendanceWithSession {
    #[serde(flatten)]
    pub record: attendance_record::Model,
    pub session: Option<session::Model>,
}

pub async fn with_sessions(
    db: &DatabaseConnection,
    records: Vec<attendance_record::Model>,
) -> Result<Vec<AttendanceWithSession>, DbErr> {
    let ids: Vec<i64> = records.iter().map(|r| r.session_id).collect();
    let sessions: HashMap<i64, session::Model> = session::Entity::find()
        .filter(session::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(records
        .into_iter()
        .map(|record| AttendanceWithSession {
            session: sessions.get(&record.session_id).cloned(),
            record,
        })
        .collect())
}

/// One record of a group report with its session slot, student and reason.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub record: attendance_record::Model,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub student_code: Option<String>,
    pub student_name: Option<String>,
    pub absence_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub summary: AttendanceTally,
    pub records: Vec<ReportRow>,
}

#[derive(Debug, Serialize)]
pub struct GroupAttendanceStats {
    pub group_id: i64,
    pub active_students: u64,
    #[serde(flatten)]
    pub tally: AttendanceTally,
}

/// Records of the group's sessions within `[from, to]`, newest session first,
/// then by student name.
pub async fn group_report(
    db: &DatabaseConnection,
    group_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<ReportRow>, DbErr> {
    let mut query = session::Entity::find().filter(session::Column::GroupId.eq(group_id));
    if let Some(from) = from {
        query = query.filter(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(session::Column::ScheduledDate.lte(to));
    }
    let sessions: HashMap<i64, session::Model> = query
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let records = attendance_record::Entity::find()
        .filter(attendance_record::Column::SessionId.is_in(sessions.keys().copied()))
        .all(db)
        .await?;

    let students: HashMap<i64, student::Model> = student::Entity::find()
        .filter(student::Column::Id.is_in(records.iter().map(|r| r.student_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let names: HashMap<i64, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(students.values().map(|s| s.user_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();
    let reasons: HashMap<i64, String> = absence_reason::Entity::find()
        .filter(
            absence_reason::Column::Id
                .is_in(records.iter().filter_map(|r| r.absence_reason_id)),
        )
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.description))
        .collect();

    let mut rows: Vec<ReportRow> = records
        .into_iter()
        .filter_map(|record| {
            let session = sessions.get(&record.session_id)?;
            let student = students.get(&record.student_id);
            Some(ReportRow {
                scheduled_date: session.scheduled_date,
                start_time: session.start_time,
                end_time: session.end_time,
                student_code: student.map(|s| s.student_code.clone()),
                student_name: student.and_then(|s| names.get(&s.user_id).cloned()),
                absence_reason: record
                    .absence_reason_id
                    .and_then(|id| reasons.get(&id).cloned()),
                record,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.scheduled_date
            .cmp(&a.scheduled_date)
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.student_name.cmp(&b.student_name))
    });
    Ok(rows)
}

/// Which referenced row is missing.
#[derive(Debug, PartialEq, Eq)]
pub enum MissingRef {
    Session,
    Student,
    AbsenceReason,
}

impl MissingRef {
    pub fn label(&self) -> &'static str {
        match self {
            MissingRef::Session => "Session",
            MissingRef::Student => "Student",
            MissingRef::AbsenceReason => "Absence reason",
        }
    }
}

/// Confirms the session, student and optional absence reason exist.
pub async fn check_refs(
    db: &DatabaseConnection,
    session_id: Option<i64>,
    student_id: Option<i64>,
    absence_reason_id: Option<i64>,
) -> Result<Option<MissingRef>, DbErr> {
    if let Some(id) = session_id {
        if session::Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(Some(MissingRef::Session));
        }
    }
    if let Some(id) = student_id {
        if student::Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(Some(MissingRef::Student));
        }
    }
    if let Some(id) = absence_reason_id {
        if absence_reason::Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(Some(MissingRef::AbsenceReason));
        }
    }
    Ok(None)
}

/// Fields written by an upsert.
#[derive(Debug, Clone)]
pub struct Mark {
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub absence_reason_id: Option<i64>,
    pub note: Option<String>,
    pub recorded_by: i64,
}

/// Creates the record for `(session, student)` or overwrites the existing one.
///
/// Returns the row and whether it was newly created.
pub async fn upsert(db: &DatabaseConnection, mark: Mark) -> Result<(attendance_record::Model, bool), DbErr> {
    let now = Utc::now();
    match attendance_record::Model::find_for(db, mark.session_id, mark.student_id).await? {
        Some(existing) => {
            let mut active: attendance_record::ActiveModel = existing.into();
            active.status = Set(mark.status);
            active.absence_reason_id = Set(mark.absence_reason_id);
            if mark.note.is_some() {
                active.note = Set(mark.note);
            }
            active.recorded_by = Set(Some(mark.recorded_by));
            active.recorded_at = Set(now);
            active.updated_at = Set(now);
            Ok((active.update(db).await?, false))
        }
        None => {
            let created = attendance_record::ActiveModel {
                session_id: Set(mark.session_id),
                student_id: Set(mark.student_id),
                status: Set(mark.status),
                recorded_at: Set(now),
                absence_reason_id: Set(mark.absence_reason_id),
                note: Set(mark.note),
                recorded_by: Set(Some(mark.recorded_by)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok((created, true))
        }
    }
}
