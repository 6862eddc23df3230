use crate::seed::Seeder;
use chrono::{Datelike, NaiveTime, Utc};
use db::models::status::LifecycleStatus;
use db::models::{course, enrollment, group, student, teacher, timetable_entry};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
};

pub struct GroupSeeder;

const GROUPS_PER_COURSE: usize = 2;
const CAPACITY: i32 = 25;
const START_HOURS: [u32; 4] = [8, 10, 13, 15];

#[async_trait::async_trait]
impl Seeder for GroupSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if group::Entity::find().count(db).await? > 0 {
            return Ok(());
        }

        let courses = course::Entity::find().all(db).await?;
        let teachers = teacher::Entity::find().all(db).await?;
        let students = student::Entity::find().all(db).await?;
        let year = Utc::now().year();

        for course in &courses {
            for n in 0..GROUPS_PER_COURSE {
                let teacher_id = match teachers.len() {
                    0 => None,
                    len => Some(teachers[fastrand::usize(..len)].id),
                };
                let name = format!("{} {}", course.code, char::from(b'A' + n as u8));
                let created =
                    group::Model::create(db, course.id, &name, year, teacher_id, Some(CAPACITY))
                        .await?;

                seed_timetable(db, created.id).await?;

                let mut pool = students.clone();
                fastrand::shuffle(&mut pool);
                for s in pool.iter().take(fastrand::usize(10..=CAPACITY as usize)) {
                    enrollment::Model::create(db, s.id, created.id).await?;
                }
            }
        }
        Ok(())
    }
}

/// Two weekly slots on distinct weekdays, so they never overlap.
async fn seed_timetable(db: &DatabaseConnection, group_id: i64) -> Result<(), DbErr> {
    let mut weekdays: Vec<i32> = (1..=5).collect();
    fastrand::shuffle(&mut weekdays);
    let now = Utc::now();

    for weekday in weekdays.into_iter().take(2) {
        let hour = START_HOURS[fastrand::usize(..START_HOURS.len())];
        let (Some(start), Some(end)) = (
            NaiveTime::from_hms_opt(hour, 0, 0),
            NaiveTime::from_hms_opt(hour + 1, 30, 0),
        ) else {
            continue;
        };
        timetable_entry::ActiveModel {
            group_id: Set(group_id),
            weekday: Set(weekday),
            start_time: Set(start),
            end_time: Set(end),
            location: Set(Some(format!("Room {}", fastrand::u32(100..130)))),
            status: Set(LifecycleStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
