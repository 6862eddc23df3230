use crate::seed::Seeder;
use db::models::course::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct CourseSeeder;

const COURSES: [(&str, &str); 6] = [
    ("MAT101", "Algebra I"),
    ("PHY101", "Physics Fundamentals"),
    ("CHE101", "General Chemistry"),
    ("ENG101", "English Composition"),
    ("HIS101", "World History"),
    ("CS101", "Introduction to Programming"),
];

#[async_trait::async_trait]
impl Seeder for CourseSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for (code, name) in COURSES {
            if Model::find_by_code(db, code).await?.is_none() {
                Model::create(db, code, name, None).await?;
            }
        }
        Ok(())
    }
}
