use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Student profile attached one-to-one to a `student` user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub student_code: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[sea_orm(string_value = "M")]
    M,

    #[sea_orm(string_value = "F")]
    F,

    #[sea_orm(string_value = "O")]
    O,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Everything needed to register a student and their login in one go.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub student_code: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl Model {
    /// Creates the `student` user and the profile inside a single transaction.
    pub async fn create_with_user(
        db: &DatabaseConnection,
        new: NewStudent,
    ) -> Result<(super::user::Model, Self), DbErr> {
        use sea_orm::{ActiveValue::Set, TransactionTrait};

        let txn = db.begin().await?;
        let user = super::user::Model::create(
            &txn,
            &new.username,
            &new.email,
            &new.password,
            &new.full_name,
            super::user::Role::Student,
            super::status::LifecycleStatus::Active,
        )
        .await?;

        let now = Utc::now();
        let student = ActiveModel {
            user_id: Set(user.id),
            student_code: Set(new.student_code),
            birth_date: Set(new.birth_date),
            gender: Set(new.gender),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((user, student))
    }

    pub async fn code_taken(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
        use sea_orm::QueryFilter;
        Ok(Entity::find()
            .filter(Column::StudentCode.eq(code))
            .one(db)
            .await?
            .is_some())
    }
}
