use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only trail of mutating API calls.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    /// JSON snapshot of the request body, if any.
    pub payload: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields of a new audit entry.
#[derive(Debug, Clone, Default)]
pub struct AuditEntry {
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub payload: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

impl AuditEntry {
    pub fn new(action: &str, resource_type: &str) -> Self {
        Self {
            action: action.to_owned(),
            resource_type: resource_type.to_owned(),
            ..Default::default()
        }
    }

    pub fn by(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn on(mut self, resource_id: i64) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    /// Attaches a JSON snapshot of `payload`; unserializable values are dropped.
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload = serde_json::to_value(payload).ok();
        self
    }

    pub fn from_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }
}

impl Model {
    pub async fn record(db: &DatabaseConnection, entry: AuditEntry) -> Result<Self, DbErr> {
        ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            resource_type: Set(entry.resource_type),
            resource_id: Set(entry.resource_id),
            payload: Set(entry.payload.map(|p| p.to_string())),
            ip_address: Set(entry.ip_address),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use serde_json::json;

    #[tokio::test]
    async fn record_stores_payload_as_json_text() {
        let db = setup_test_db().await;
        let saved = Model::record(
            &db,
            AuditEntry::new("create", "course")
                .on(7)
                .with_payload(&json!({ "code": "MATH101" }))
                .from_ip("127.0.0.1"),
        )
        .await
        .unwrap();

        assert_eq!(saved.user_id, None);
        assert_eq!(saved.resource_id, Some(7));
        assert_eq!(saved.payload.as_deref(), Some(r#"{"code":"MATH101"}"#));
        assert_eq!(saved.ip_address.as_deref(), Some("127.0.0.1"));
    }
}
