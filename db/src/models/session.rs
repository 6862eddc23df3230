use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One dated occurrence of a group's class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    /// Copied from the group at creation time.
    pub course_id: i64,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SessionStatus,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "planned")]
    Planned,

    #[sea_orm(string_value = "held")]
    Held,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl SessionStatus {
    /// `planned -> held` and `planned -> cancelled` are the only moves.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Planned, SessionStatus::Held)
                | (SessionStatus::Planned, SessionStatus::Cancelled)
        )
    }
}

/// Sessions per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTally {
    pub total: u64,
    pub planned: u64,
    pub held: u64,
    pub cancelled: u64,
}

impl SessionTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = SessionStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut t, status| {
            t.total += 1;
            match status {
                SessionStatus::Planned => t.planned += 1,
                SessionStatus::Held => t.held += 1,
                SessionStatus::Cancelled => t.cancelled += 1,
            }
            t
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Moves the session to `next` if the state machine allows it.
    ///
    /// Returns `Ok(None)` when the transition is not permitted.
    pub async fn transition(
        &self,
        db: &DatabaseConnection,
        next: SessionStatus,
    ) -> Result<Option<Self>, DbErr> {
        use sea_orm::ActiveValue::Set;

        if !self.status.can_transition_to(next) {
            return Ok(None);
        }
        let mut active: ActiveModel = self.clone().into();
        active.status = Set(next);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStatus::{self, *};
    use std::str::FromStr;

    #[test]
    fn only_planned_sessions_move() {
        assert!(Planned.can_transition_to(Held));
        assert!(Planned.can_transition_to(Cancelled));
        assert!(!Planned.can_transition_to(Planned));
        assert!(!Held.can_transition_to(Planned));
        assert!(!Held.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Planned));
        assert!(!Cancelled.can_transition_to(Held));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(SessionStatus::from_str("HELD").unwrap(), Held);
        assert_eq!(Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn tally_counts_each_status() {
        let t = super::SessionTally::from_statuses([Planned, Planned, Held, Cancelled]);
        assert_eq!((t.total, t.planned, t.held, t.cancelled), (4, 2, 1, 1));
    }
}
