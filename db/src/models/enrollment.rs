use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub group_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "enrollment_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "inactive")]
    Inactive,

    #[sea_orm(string_value = "graduated")]
    Graduated,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Seats used versus the group's optional capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    pub capacity: Option<i32>,
    pub enrolled: u64,
    pub available: Option<u64>,
    pub full: bool,
}

impl Capacity {
    pub fn new(capacity: Option<i32>, enrolled: u64) -> Self {
        let available = capacity.map(|c| (c.max(0) as u64).saturating_sub(enrolled));
        Self {
            capacity,
            enrolled,
            available,
            full: available == Some(0),
        }
    }
}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        student_id: i64,
        group_id: i64,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            student_id: Set(student_id),
            group_id: Set(group_id),
            status: Set(EnrollmentStatus::Active),
            enrolled_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn exists(db: &DatabaseConnection, student_id: i64, group_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::GroupId.eq(group_id))
            .one(db)
            .await?
            .is_some())
    }

    pub async fn active_count(db: &DatabaseConnection, group_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::GroupId.eq(group_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active))
            .count(db)
            .await
    }

    pub async fn capacity(db: &DatabaseConnection, group: &super::group::Model) -> Result<Capacity, DbErr> {
        let enrolled = Self::active_count(db, group.id).await?;
        Ok(Capacity::new(group.max_capacity, enrolled))
    }
}

#[cfg(test)]
mod tests {
    use super::Capacity;

    #[test]
    fn capacity_reports_remaining_seats() {
        let c = Capacity::new(Some(3), 1);
        assert_eq!(c.available, Some(2));
        assert!(!c.full);

        let full = Capacity::new(Some(2), 2);
        assert!(full.full);

        let unbounded = Capacity::new(None, 40);
        assert_eq!(unbounded.available, None);
        assert!(!unbounded.full);
    }
}
