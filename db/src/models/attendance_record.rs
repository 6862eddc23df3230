use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One student's attendance in one session. `(session_id, student_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
    pub absence_reason_id: Option<i64>,
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "excused")]
    Excused,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::absence_reason::Entity",
        from = "Column::AbsenceReasonId",
        to = "super::absence_reason::Column::Id",
        on_delete = "SetNull"
    )]
    AbsenceReason,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::absence_reason::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AbsenceReason.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Per-status counters over a set of attendance records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceTally {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    /// `(present + late) / total * 100`, two decimals; zero when empty.
    pub attendance_rate: f64,
}

impl AttendanceTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut tally = Self::default();
        for status in statuses {
            tally.total += 1;
            match status {
                AttendanceStatus::Present => tally.present += 1,
                AttendanceStatus::Absent => tally.absent += 1,
                AttendanceStatus::Late => tally.late += 1,
                AttendanceStatus::Excused => tally.excused += 1,
            }
        }
        tally.attendance_rate = percentage(tally.present + tally.late, tally.total);
        tally
    }
}

/// `part / total * 100` rounded to two decimals; zero when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

impl Model {
    pub async fn find_for(
        db: &DatabaseConnection,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    /// Tallies the records matching `condition`.
    pub async fn tally(
        db: &DatabaseConnection,
        condition: sea_orm::Condition,
    ) -> Result<AttendanceTally, DbErr> {
        let statuses: Vec<AttendanceStatus> = Entity::find()
            .select_only()
            .column(Column::Status)
            .filter(condition)
            .into_tuple()
            .all(db)
            .await?;
        Ok(AttendanceTally::from_statuses(statuses))
    }

    pub async fn tally_for_session(db: &DatabaseConnection, session_id: i64) -> Result<AttendanceTally, DbErr> {
        Self::tally(db, sea_orm::Condition::all().add(Column::SessionId.eq(session_id))).await
    }

    pub async fn tally_for_student(db: &DatabaseConnection, student_id: i64) -> Result<AttendanceTally, DbErr> {
        Self::tally(db, sea_orm::Condition::all().add(Column::StudentId.eq(student_id))).await
    }

    /// Absent records may be turned into excused ones; nothing else can.
    pub fn can_be_justified(&self) -> bool {
        self.status == AttendanceStatus::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::AttendanceStatus::*;
    use super::*;

    #[test]
    fn tally_counts_late_as_attended() {
        let t = AttendanceTally::from_statuses([Present, Late, Absent]);
        assert_eq!(t.total, 3);
        assert_eq!(t.present, 1);
        assert_eq!(t.late, 1);
        assert_eq!(t.absent, 1);
        assert_eq!(t.attendance_rate, 66.67);
    }

    #[test]
    fn empty_tally_has_zero_rate() {
        let t = AttendanceTally::from_statuses(Vec::new());
        assert_eq!(t.total, 0);
        assert_eq!(t.attendance_rate, 0.0);
    }

    #[test]
    fn excused_is_not_attended() {
        let t = AttendanceTally::from_statuses([Excused, Present]);
        assert_eq!(t.attendance_rate, 50.0);
        assert_eq!(t.excused, 1);
    }
}
