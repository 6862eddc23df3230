use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Teacher profile attached one-to-one to a `teacher` user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub teacher_code: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub hired_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
    #[sea_orm(has_many = "super::group::Entity")]
    Groups,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default)]
pub struct NewTeacher {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub teacher_code: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialty: Option<String>,
    pub hired_on: Option<NaiveDate>,
}

impl Model {
    /// Creates the `teacher` user and the profile inside a single transaction.
    pub async fn create_with_user(
        db: &DatabaseConnection,
        new: NewTeacher,
    ) -> Result<(super::user::Model, Self), DbErr> {
        use sea_orm::{ActiveValue::Set, TransactionTrait};

        let txn = db.begin().await?;
        let user = super::user::Model::create(
            &txn,
            &new.username,
            &new.email,
            &new.password,
            &new.full_name,
            super::user::Role::Teacher,
            super::status::LifecycleStatus::Active,
        )
        .await?;

        let now = Utc::now();
        let teacher = ActiveModel {
            user_id: Set(user.id),
            teacher_code: Set(new.teacher_code),
            department: Set(new.department),
            phone: Set(new.phone),
            address: Set(new.address),
            specialty: Set(new.specialty),
            hired_on: Set(new.hired_on),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((user, teacher))
    }

    pub async fn code_taken(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
        Ok(Self::find_by_code(db, code).await?.is_some())
    }

    pub async fn find_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<Self>, DbErr> {
        use sea_orm::QueryFilter;
        Entity::find()
            .filter(Column::TeacherCode.eq(code.trim()))
            .one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_with_user_links_profile_and_rolls_back_on_duplicate() {
        let db = setup_test_db().await;
        let new = NewTeacher {
            username: "tch".into(),
            email: "tch@example.com".into(),
            password: "secret1".into(),
            full_name: "Ana Teacher".into(),
            teacher_code: "T-001".into(),
            department: Some("Math".into()),
            ..Default::default()
        };

        let (u, t) = Model::create_with_user(&db, new.clone()).await.unwrap();
        assert_eq!(t.user_id, u.id);
        assert_eq!(u.role, user::Role::Teacher);
        assert!(Model::code_taken(&db, "T-001").await.unwrap());

        // Same code, different identity: the profile insert fails and the user row is rolled back.
        let dup = NewTeacher {
            username: "tch2".into(),
            email: "tch2@example.com".into(),
            ..new
        };
        assert!(Model::create_with_user(&db, dup).await.is_err());
        assert!(user::Model::find_by_email(&db, "tch2@example.com").await.unwrap().is_none());
    }
}
