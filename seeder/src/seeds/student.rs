use crate::seed::Seeder;
use chrono::NaiveDate;
use db::models::student::{self, Gender, NewStudent};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

pub struct StudentSeeder;

const STUDENTS: u32 = 60;

#[async_trait::async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if student::Entity::find().count(db).await? > 0 {
            return Ok(());
        }

        for n in 1..=STUDENTS {
            let full_name: String = Name().fake();
            let gender = match fastrand::u8(..3) {
                0 => Gender::M,
                1 => Gender::F,
                _ => Gender::O,
            };
            let birth_date = NaiveDate::from_ymd_opt(
                fastrand::i32(2006..=2012),
                fastrand::u32(1..=12),
                fastrand::u32(1..=28),
            );
            student::Model::create_with_user(
                db,
                NewStudent {
                    username: format!("s{n:05}"),
                    email: format!("s{n:05}@students.example.com"),
                    password: "password123".into(),
                    full_name,
                    student_code: format!("S{n:05}"),
                    birth_date,
                    gender: Some(gender),
                },
            )
            .await?;
        }
        Ok(())
    }
}
