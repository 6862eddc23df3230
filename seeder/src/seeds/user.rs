use crate::seed::Seeder;
use db::models::status::LifecycleStatus;
use db::models::teacher::{self, NewTeacher};
use db::models::user::{Model, Role};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

const DEPARTMENTS: [&str; 4] = ["Mathematics", "Sciences", "Languages", "Humanities"];

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if Model::find_by_email(db, "admin@example.com").await?.is_some() {
            return Ok(());
        }

        // Fixed admin account
        Model::create(
            db,
            "admin",
            "admin@example.com",
            "password123",
            "Administrator",
            Role::Admin,
            LifecycleStatus::Active,
        )
        .await?;

        // Fixed teacher account
        teacher::Model::create_with_user(
            db,
            NewTeacher {
                username: "teacher".into(),
                email: "teacher@example.com".into(),
                password: "password123".into(),
                full_name: "Default Teacher".into(),
                teacher_code: "T0001".into(),
                department: Some(DEPARTMENTS[0].into()),
                phone: None,
                address: None,
                specialty: None,
                hired_on: None,
            },
        )
        .await?;

        for n in 2..=6 {
            let full_name: String = Name().fake();
            teacher::Model::create_with_user(
                db,
                NewTeacher {
                    username: format!("teacher{n}"),
                    email: format!("teacher{n}@example.com"),
                    password: "password123".into(),
                    full_name,
                    teacher_code: format!("T{n:04}"),
                    department: Some(DEPARTMENTS[fastrand::usize(..DEPARTMENTS.len())].into()),
                    phone: None,
                    address: None,
                    specialty: None,
                    hired_on: None,
                },
            )
            .await?;
        }
        Ok(())
    }
}
