use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::status::LifecycleStatus;

/// A recurring weekly slot of a group.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    /// ISO weekday, Monday = 1 .. Sunday = 7.
    pub weekday: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub status: LifecycleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English name for an ISO weekday number; `None` outside 1..=7.
pub fn weekday_name(weekday: i32) -> Option<&'static str> {
    usize::try_from(weekday)
        .ok()
        .and_then(|d| d.checked_sub(1))
        .and_then(|i| WEEKDAY_NAMES.get(i).copied())
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == LifecycleStatus::Active
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday).unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::weekday_name;

    #[test]
    fn weekday_names_follow_iso_numbering() {
        assert_eq!(weekday_name(1), Some("Monday"));
        assert_eq!(weekday_name(3), Some("Wednesday"));
        assert_eq!(weekday_name(7), Some("Sunday"));
        assert_eq!(weekday_name(0), None);
        assert_eq!(weekday_name(8), None);
    }
}
