use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A persisted access/refresh token pair. Only SHA-256 digests are stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub refresh_hash: String,
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Hex-encoded SHA-256 digest of a raw token.
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

fn random_alphanumeric(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A random 64-character alphanumeric refresh token.
pub fn generate_refresh_token() -> String {
    random_alphanumeric(64)
}

/// Unique id embedded in each access token so two tokens never hash alike.
pub fn generate_token_id() -> String {
    random_alphanumeric(24)
}

/// Where a token pair was issued from.
#[derive(Debug, Clone, Default)]
pub struct IssueContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Model {
    /// Stores the digests of a freshly issued access/refresh pair.
    pub async fn store(
        db: &DatabaseConnection,
        user_id: i64,
        access_token: &str,
        refresh_token: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        ctx: IssueContext,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(hash_token(access_token)),
            refresh_hash: Set(hash_token(refresh_token)),
            expires_at: Set(now + access_ttl),
            refresh_expires_at: Set(now + refresh_ttl),
            revoked: Set(false),
            ip_address: Set(ctx.ip_address),
            user_agent: Set(ctx.user_agent),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Looks up the row for a raw access token, revoked or not.
    pub async fn find_by_access_token(
        db: &DatabaseConnection,
        access_token: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::TokenHash.eq(hash_token(access_token)))
            .one(db)
            .await
    }

    /// Looks up a refresh token that is neither revoked nor expired.
    pub async fn find_valid_refresh(
        db: &DatabaseConnection,
        refresh_token: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::RefreshHash.eq(hash_token(refresh_token)))
            .filter(Column::Revoked.eq(false))
            .filter(Column::RefreshExpiresAt.gt(Utc::now()))
            .one(db)
            .await
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }

    pub async fn revoke(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut active: ActiveModel = self.clone().into();
        active.revoked = Set(true);
        active.update(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{status::LifecycleStatus, user};
    use crate::test_utils::setup_test_db;

    #[test]
    fn hash_is_stable_hex_sha256() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn store_lookup_and_revoke() {
        let db = setup_test_db().await;
        let u = user::Model::create(
            &db,
            "tok",
            "tok@example.com",
            "secret1",
            "Token Owner",
            user::Role::Student,
            LifecycleStatus::Active,
        )
        .await
        .unwrap();

        let refresh = generate_refresh_token();
        let row = Model::store(
            &db,
            u.id,
            "access-abc",
            &refresh,
            Duration::minutes(5),
            Duration::days(1),
            IssueContext::default(),
        )
        .await
        .unwrap();
        assert!(row.is_usable(Utc::now()));

        let found = Model::find_by_access_token(&db, "access-abc").await.unwrap().unwrap();
        assert_eq!(found.id, row.id);
        assert!(Model::find_valid_refresh(&db, &refresh).await.unwrap().is_some());

        found.revoke(&db).await.unwrap();
        let after = Model::find_by_access_token(&db, "access-abc").await.unwrap().unwrap();
        assert!(after.revoked);
        assert!(!after.is_usable(Utc::now()));
        assert!(Model::find_valid_refresh(&db, &refresh).await.unwrap().is_none());
    }
}
