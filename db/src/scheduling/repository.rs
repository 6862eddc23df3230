use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::models::session::SessionStatus;
use crate::models::{group, session, timetable_entry};

/// Fields of a session produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub group_id: i64,
    pub course_id: i64,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_by: Option<i64>,
}

/// Store operations needed by the conflict checker and the session generator.
#[async_trait]
pub trait SchedulingRepository: Send + Sync {
    async fn find_group(&self, group_id: i64) -> Result<Option<group::Model>, DbErr>;

    /// All entries of the group, whatever their status, ordered by weekday then start.
    async fn find_timetable_entries_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<timetable_entry::Model>, DbErr>;

    async fn find_session_by_group_date_time(
        &self,
        group_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<Option<session::Model>, DbErr>;

    /// Inserts a `planned` session.
    ///
    /// Returns `Ok(None)` when a session with the same group, date and start
    /// time already exists.
    async fn insert_session(&self, new: NewSession) -> Result<Option<session::Model>, DbErr>;
}

#[derive(Clone)]
pub struct SeaOrmSchedulingRepository {
    db: DatabaseConnection,
}

impl SeaOrmSchedulingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SchedulingRepository for SeaOrmSchedulingRepository {
    async fn find_group(&self, group_id: i64) -> Result<Option<group::Model>, DbErr> {
        group::Entity::find_by_id(group_id).one(&self.db).await
    }

    async fn find_timetable_entries_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<timetable_entry::Model>, DbErr> {
        timetable_entry::Entity::find()
            .filter(timetable_entry::Column::GroupId.eq(group_id))
            .order_by_asc(timetable_entry::Column::Weekday)
            .order_by_asc(timetable_entry::Column::StartTime)
            .all(&self.db)
            .await
    }

    async fn find_session_by_group_date_time(
        &self,
        group_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<Option<session::Model>, DbErr> {
        session::Entity::find()
            .filter(session::Column::GroupId.eq(group_id))
            .filter(session::Column::ScheduledDate.eq(date))
            .filter(session::Column::StartTime.eq(start_time))
            .one(&self.db)
            .await
    }

    async fn insert_session(&self, new: NewSession) -> Result<Option<session::Model>, DbErr> {
        let now = Utc::now();
        let active = session::ActiveModel {
            group_id: Set(new.group_id),
            course_id: Set(new.course_id),
            scheduled_date: Set(new.scheduled_date),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            status: Set(SessionStatus::Planned),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = session::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([
                    session::Column::GroupId,
                    session::Column::ScheduledDate,
                    session::Column::StartTime,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted == 0 {
            return Ok(None);
        }

        self.find_session_by_group_date_time(new.group_id, new.scheduled_date, new.start_time)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{course, group};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn insert_ignores_duplicate_slot() {
        let db = setup_test_db().await;
        let course = course::Model::create(&db, "math101", "Mathematics", None)
            .await
            .unwrap();
        let group = group::Model::create(&db, course.id, "A", 2025, None, None)
            .await
            .unwrap();
        let repo = SeaOrmSchedulingRepository::new(db.clone());

        let new = NewSession {
            group_id: group.id,
            course_id: course.id,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            created_by: None,
        };

        let first = repo.insert_session(new.clone()).await.unwrap();
        let first = first.expect("first insert should create a row");
        assert_eq!(first.status, SessionStatus::Planned);
        assert_eq!(first.course_id, course.id);

        let second = repo.insert_session(new).await.unwrap();
        assert!(second.is_none());

        let count = session::Entity::find().all(&db).await.unwrap().len();
        assert_eq!(count, 1);
    }
}
