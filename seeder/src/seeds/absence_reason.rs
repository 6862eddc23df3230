use crate::seed::Seeder;
use chrono::Utc;
use db::models::absence_reason::{ActiveModel, Model};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};

pub struct AbsenceReasonSeeder;

const REASONS: [(&str, &str); 5] = [
    ("MED", "Medical appointment or illness"),
    ("FAM", "Family matter"),
    ("TRN", "Transport disruption"),
    ("SPT", "School sports event"),
    ("OTH", "Other"),
];

#[async_trait::async_trait]
impl Seeder for AbsenceReasonSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let now = Utc::now();
        for (code, description) in REASONS {
            if Model::find_by_code(db, code).await?.is_some() {
                continue;
            }
            ActiveModel {
                code: Set(code.to_owned()),
                description: Set(description.to_owned()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }
}
