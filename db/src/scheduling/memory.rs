use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::DbErr;

use super::repository::{NewSession, SchedulingRepository};
use crate::models::session::SessionStatus;
use crate::models::status::LifecycleStatus;
use crate::models::{group, session, timetable_entry};

/// Vec-backed repository for unit tests.
#[derive(Default)]
pub struct InMemorySchedulingRepository {
    groups: Mutex<Vec<group::Model>>,
    entries: Mutex<Vec<timetable_entry::Model>>,
    sessions: Mutex<Vec<session::Model>>,
    failing_dates: Mutex<HashSet<NaiveDate>>,
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl InMemorySchedulingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(self, id: i64, course_id: i64) -> Self {
        let now = Utc::now();
        self.groups.lock().unwrap().push(group::Model {
            id,
            course_id,
            name: format!("G{id}"),
            academic_year: 2025,
            teacher_id: None,
            max_capacity: None,
            classroom: None,
            shift: None,
            created_at: now,
            updated_at: now,
        });
        self
    }

    pub fn with_entry(self, id: i64, group_id: i64, weekday: i32, start: NaiveTime, end: NaiveTime) -> Self {
        self.with_entry_status(id, group_id, weekday, start, end, LifecycleStatus::Active)
    }

    pub fn with_entry_status(
        self,
        id: i64,
        group_id: i64,
        weekday: i32,
        start: NaiveTime,
        end: NaiveTime,
        status: LifecycleStatus,
    ) -> Self {
        let now = Utc::now();
        self.entries.lock().unwrap().push(timetable_entry::Model {
            id,
            group_id,
            weekday,
            start_time: start,
            end_time: end,
            location: None,
            status,
            created_at: now,
            updated_at: now,
        });
        self
    }

    /// Makes every insert on `date` fail with a storage error.
    pub fn failing_on(self, date: NaiveDate) -> Self {
        self.failing_dates.lock().unwrap().insert(date);
        self
    }

    pub fn sessions(&self) -> Vec<session::Model> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SchedulingRepository for InMemorySchedulingRepository {
    async fn find_group(&self, group_id: i64) -> Result<Option<group::Model>, DbErr> {
        Ok(self.groups.lock().unwrap().iter().find(|g| g.id == group_id).cloned())
    }

    async fn find_timetable_entries_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<timetable_entry::Model>, DbErr> {
        let mut entries: Vec<_> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.weekday, e.start_time));
        Ok(entries)
    }

    async fn find_session_by_group_date_time(
        &self,
        group_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<Option<session::Model>, DbErr> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.group_id == group_id && s.scheduled_date == date && s.start_time == start_time)
            .cloned())
    }

    async fn insert_session(&self, new: NewSession) -> Result<Option<session::Model>, DbErr> {
        if self.failing_dates.lock().unwrap().contains(&new.scheduled_date) {
            return Err(DbErr::Custom("simulated insert failure".into()));
        }

        let mut sessions = self.sessions.lock().unwrap();
        let duplicate = sessions.iter().any(|s| {
            s.group_id == new.group_id
                && s.scheduled_date == new.scheduled_date
                && s.start_time == new.start_time
        });
        if duplicate {
            return Ok(None);
        }

        let now = Utc::now();
        let model = session::Model {
            id: sessions.len() as i64 + 1,
            group_id: new.group_id,
            course_id: new.course_id,
            scheduled_date: new.scheduled_date,
            start_time: new.start_time,
            end_time: new.end_time,
            status: SessionStatus::Planned,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        sessions.push(model.clone());
        Ok(Some(model))
    }
}
