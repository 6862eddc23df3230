use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::status::LifecycleStatus;

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    /// System-wide role.
    pub role: Role,
    /// Only active users may authenticate.
    pub status: LifecycleStatus,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::auth_token::Entity")]
    AuthTokens,
}

impl Related<super::auth_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Hashes a plaintext password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
}

impl Model {
    /// Inserts a new user with a freshly hashed password.
    ///
    /// Accepts any connection so it can run inside the transaction that also
    /// creates a student or teacher profile.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
        status: LifecycleStatus,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_lowercase()),
            password_hash: Set(hash_password(password)?),
            full_name: Set(full_name.to_owned()),
            role: Set(role),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active.insert(db).await
    }

    pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(db)
            .await
    }

    /// Whether a user already holds `username` or `email`.
    pub async fn identity_taken<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
    ) -> Result<bool, DbErr> {
        let found = Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(Column::Username.eq(username))
                    .add(Column::Email.eq(email.to_lowercase())),
            )
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LifecycleStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_hashes_and_verifies_password() {
        let db = setup_test_db().await;
        let user = Model::create(
            &db,
            "jdoe",
            "JDoe@Example.com",
            "secret1",
            "Jane Doe",
            Role::Teacher,
            LifecycleStatus::Active,
        )
        .await
        .unwrap();

        assert_eq!(user.email, "jdoe@example.com");
        assert_ne!(user.password_hash, "secret1");
        assert!(user.verify_password("secret1"));
        assert!(!user.verify_password("wrong"));
        assert!(user.is_active());
        assert!(!user.is_admin());

        let found = Model::find_by_email(&db, "jdoe@EXAMPLE.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(Model::identity_taken(&db, "jdoe", "other@example.com").await.unwrap());
        assert!(!Model::identity_taken(&db, "nobody", "nobody@example.com").await.unwrap());
    }
}
