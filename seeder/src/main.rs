use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    absence_reason::AbsenceReasonSeeder, course::CourseSeeder, group::GroupSeeder,
    student::StudentSeeder, user::UserSeeder,
};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Database connection failed: {e}");
            std::process::exit(1);
        }
    };

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder>, "User"),
        (Box::new(CourseSeeder), "Course"),
        (Box::new(AbsenceReasonSeeder), "AbsenceReason"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(GroupSeeder), "Group"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
