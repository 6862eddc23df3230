use chrono::{Datelike, NaiveDate};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use super::repository::{NewSession, SchedulingRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub group_id: i64,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub created_by: Option<i64>,
}

/// Outcome of a generation run.
///
/// `skipped` counts slots that already had a session, including ones created
/// concurrently between the existence check and the insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub created: u32,
    pub failed: u32,
    pub skipped: u32,
    pub message: String,
}

impl GenerationReport {
    fn empty(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Date range spans {days} days, the maximum is {max}")]
    RangeTooLarge { days: i64, max: i64 },
    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

/// Expands a group's weekly timetable into dated `planned` sessions.
pub struct SessionGenerator<'a, R: SchedulingRepository + ?Sized> {
    repo: &'a R,
    max_days: i64,
}

impl<'a, R: SchedulingRepository + ?Sized> SessionGenerator<'a, R> {
    /// Uses `SESSION_GENERATION_MAX_DAYS` as the range cap.
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            max_days: util::config::session_generation_max_days(),
        }
    }

    pub fn with_max_days(mut self, max_days: i64) -> Self {
        self.max_days = max_days;
        self
    }

    /// Runs one generation pass over `[start_date, end_date]`.
    ///
    /// Missing groups and empty timetables produce an empty report, not an error.
    /// A failed insert is counted and the run continues; sessions already
    /// inserted stay in place.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationReport, GenerationError> {
        let GenerationRequest {
            group_id,
            start_date,
            end_date,
            created_by,
        } = request;

        if start_date > end_date {
            return Err(GenerationError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        let days = (end_date - start_date).num_days() + 1;
        if days > self.max_days {
            return Err(GenerationError::RangeTooLarge {
                days,
                max: self.max_days,
            });
        }

        let Some(group) = self.repo.find_group(group_id).await? else {
            return Ok(GenerationReport::empty("Group not found"));
        };
        let entries = self.repo.find_timetable_entries_for_group(group_id).await?;
        if entries.is_empty() {
            return Ok(GenerationReport::empty(
                "Group has no timetable entries configured",
            ));
        }

        let mut report = GenerationReport::default();
        for date in start_date.iter_days().take(days as usize) {
            let weekday = date.weekday().number_from_monday() as i32;

            for entry in entries.iter().filter(|e| e.weekday == weekday) {
                let existing = self
                    .repo
                    .find_session_by_group_date_time(group_id, date, entry.start_time)
                    .await;
                match existing {
                    Ok(Some(_)) => {
                        report.skipped += 1;
                        continue;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(group_id, %date, error = %err, "Session lookup failed");
                        report.failed += 1;
                        continue;
                    }
                }

                let new = NewSession {
                    group_id,
                    course_id: group.course_id,
                    scheduled_date: date,
                    start_time: entry.start_time,
                    end_time: entry.end_time,
                    created_by,
                };
                match self.repo.insert_session(new).await {
                    Ok(Some(_)) => report.created += 1,
                    Ok(None) => report.skipped += 1,
                    Err(err) => {
                        tracing::warn!(group_id, %date, error = %err, "Session insert failed");
                        report.failed += 1;
                    }
                }
            }
        }

        report.message = format!("Generated {} sessions successfully", report.created);
        tracing::info!(
            group_id,
            %start_date,
            %end_date,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            "Session generation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SessionStatus;
    use crate::scheduling::memory::{InMemorySchedulingRepository, date, time};

    fn request(group_id: i64, start: NaiveDate, end: NaiveDate) -> GenerationRequest {
        GenerationRequest {
            group_id,
            start_date: start,
            end_date: end,
            created_by: Some(42),
        }
    }

    #[tokio::test]
    async fn wednesday_entry_over_two_weeks_yields_two_sessions() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(1, 1, 3, time(9, 0), time(10, 0));
        let generator = SessionGenerator::new(&repo).with_max_days(366);

        // Monday 2025-01-06 .. Sunday 2025-01-19
        let report = generator
            .generate(request(1, date(2025, 1, 6), date(2025, 1, 19)))
            .await
            .unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.message, "Generated 2 sessions successfully");
        let dates: Vec<_> = repo.sessions().iter().map(|s| s.scheduled_date).collect();
        assert_eq!(dates, vec![date(2025, 1, 8), date(2025, 1, 15)]);
    }

    #[tokio::test]
    async fn wednesday_and_friday_in_early_january() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(1, 1, 3, time(8, 0), time(9, 0))
            .with_entry(2, 1, 5, time(8, 0), time(9, 0));
        let generator = SessionGenerator::new(&repo).with_max_days(366);

        let report = generator
            .generate(request(1, date(2025, 1, 1), date(2025, 1, 10)))
            .await
            .unwrap();

        assert_eq!(report.created, 4);
        let sessions = repo.sessions();
        let dates: Vec<_> = sessions.iter().map(|s| s.scheduled_date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 1), date(2025, 1, 3), date(2025, 1, 8), date(2025, 1, 10)]
        );
        for s in &sessions {
            assert_eq!(s.status, SessionStatus::Planned);
            assert_eq!(s.course_id, 10);
            assert_eq!(s.created_by, Some(42));
            assert_eq!(s.start_time, time(8, 0));
            assert_eq!(s.end_time, time(9, 0));
        }
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(1, 1, 3, time(8, 0), time(9, 0))
            .with_entry(2, 1, 5, time(8, 0), time(9, 0));
        let generator = SessionGenerator::new(&repo).with_max_days(366);
        let req = request(1, date(2025, 1, 1), date(2025, 1, 10));

        let first = generator.generate(req).await.unwrap();
        let second = generator.generate(req).await.unwrap();

        assert_eq!(first.created, 4);
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 4);
        assert_eq!(second.message, "Generated 0 sessions successfully");
        assert_eq!(repo.sessions().len(), 4);
    }

    #[tokio::test]
    async fn empty_timetable_is_a_no_op() {
        let repo = InMemorySchedulingRepository::new().with_group(1, 10);
        let generator = SessionGenerator::new(&repo).with_max_days(366);

        let report = generator
            .generate(request(1, date(2025, 1, 1), date(2025, 3, 1)))
            .await
            .unwrap();

        assert_eq!((report.created, report.failed), (0, 0));
        assert_eq!(report.message, "Group has no timetable entries configured");
        assert!(repo.sessions().is_empty());
    }

    #[tokio::test]
    async fn unknown_group_is_a_no_op() {
        let repo = InMemorySchedulingRepository::new();
        let generator = SessionGenerator::new(&repo).with_max_days(366);

        let report = generator
            .generate(request(9, date(2025, 1, 1), date(2025, 1, 2)))
            .await
            .unwrap();

        assert_eq!((report.created, report.failed), (0, 0));
        assert_eq!(report.message, "Group not found");
    }

    #[tokio::test]
    async fn failed_inserts_are_counted_and_the_run_continues() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(1, 1, 3, time(8, 0), time(9, 0))
            .failing_on(date(2025, 1, 1));
        let generator = SessionGenerator::new(&repo).with_max_days(366);

        let report = generator
            .generate(request(1, date(2025, 1, 1), date(2025, 1, 15)))
            .await
            .unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(repo.sessions().len(), 2);
    }

    #[tokio::test]
    async fn rejects_reversed_and_oversized_ranges() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(1, 1, 3, time(8, 0), time(9, 0));
        let generator = SessionGenerator::new(&repo).with_max_days(31);

        let reversed = generator
            .generate(request(1, date(2025, 2, 1), date(2025, 1, 1)))
            .await;
        assert!(matches!(reversed, Err(GenerationError::InvalidRange { .. })));

        let too_long = generator
            .generate(request(1, date(2025, 1, 1), date(2025, 2, 1)))
            .await;
        assert!(matches!(
            too_long,
            Err(GenerationError::RangeTooLarge { days: 32, max: 31 })
        ));

        let single_day = generator
            .generate(request(1, date(2025, 1, 1), date(2025, 1, 1)))
            .await
            .unwrap();
        assert_eq!(single_day.created, 1);
    }
}
