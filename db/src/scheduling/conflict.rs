use sea_orm::DbErr;

use super::repository::SchedulingRepository;
use super::time::TimeSlot;
use crate::models::timetable_entry;

/// Half-open interval overlap. Touching boundaries do not overlap.
pub fn overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.start() < b.end() && b.start() < a.end()
}

/// A candidate slot for one group on one ISO weekday.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery {
    pub group_id: i64,
    pub weekday: i32,
    pub slot: TimeSlot,
    /// Entry to ignore, set when re-checking an entry being updated.
    pub exclude_id: Option<i64>,
}

pub struct ConflictChecker<'a, R: SchedulingRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: SchedulingRepository + ?Sized> ConflictChecker<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// First active entry of the group on the same weekday that overlaps the candidate.
    pub async fn find_conflict(
        &self,
        query: &SlotQuery,
    ) -> Result<Option<timetable_entry::Model>, DbErr> {
        let entries = self
            .repo
            .find_timetable_entries_for_group(query.group_id)
            .await?;

        Ok(entries.into_iter().find(|entry| {
            entry.is_active()
                && entry.weekday == query.weekday
                && Some(entry.id) != query.exclude_id
                && entry_slot(entry).is_some_and(|existing| overlaps(&existing, &query.slot))
        }))
    }

    pub async fn has_conflict(&self, query: &SlotQuery) -> Result<bool, DbErr> {
        Ok(self.find_conflict(query).await?.is_some())
    }
}

// Rows written through the API always satisfy end > start; anything else is skipped.
fn entry_slot(entry: &timetable_entry::Model) -> Option<TimeSlot> {
    TimeSlot::new(entry.start_time, entry.end_time).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::LifecycleStatus;
    use crate::scheduling::memory::{InMemorySchedulingRepository, time};

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::parse(start, end).unwrap()
    }

    fn query(weekday: i32, start: &str, end: &str, exclude_id: Option<i64>) -> SlotQuery {
        SlotQuery {
            group_id: 1,
            weekday,
            slot: slot(start, end),
            exclude_id,
        }
    }

    #[test]
    fn back_to_back_slots_do_not_overlap() {
        assert!(!overlaps(&slot("09:00", "10:00"), &slot("10:00", "11:00")));
        assert!(!overlaps(&slot("10:00", "11:00"), &slot("09:00", "10:00")));
    }

    #[test]
    fn partial_containing_and_identical_slots_overlap() {
        assert!(overlaps(&slot("09:00", "10:30"), &slot("10:00", "11:00")));
        assert!(overlaps(&slot("08:00", "12:00"), &slot("09:00", "10:00")));
        assert!(overlaps(&slot("09:00", "10:00"), &slot("09:00", "10:00")));
    }

    #[test]
    fn overlap_matches_half_open_rule_and_is_symmetric() {
        let hours: Vec<TimeSlot> = (7..12)
            .flat_map(|s| ((s + 1)..13).map(move |e| (s, e)))
            .map(|(s, e)| TimeSlot::new(time(s, 0), time(e, 30)).unwrap())
            .collect();

        for a in &hours {
            for b in &hours {
                let expected = a.start() < b.end() && b.start() < a.end();
                assert_eq!(overlaps(a, b), expected);
                assert_eq!(overlaps(a, b), overlaps(b, a));
            }
        }
    }

    #[tokio::test]
    async fn detects_overlap_on_same_weekday_only() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(5, 1, 3, time(9, 0), time(10, 30));
        let checker = ConflictChecker::new(&repo);

        let hit = checker.find_conflict(&query(3, "10:00", "11:00", None)).await.unwrap();
        assert_eq!(hit.map(|e| e.id), Some(5));

        assert!(!checker.has_conflict(&query(4, "10:00", "11:00", None)).await.unwrap());
        assert!(!checker.has_conflict(&query(3, "10:30", "11:30", None)).await.unwrap());
    }

    #[tokio::test]
    async fn excluded_entry_never_conflicts_with_itself() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_entry(5, 1, 3, time(9, 0), time(10, 0));
        let checker = ConflictChecker::new(&repo);

        assert!(checker.has_conflict(&query(3, "09:00", "10:00", None)).await.unwrap());
        assert!(!checker.has_conflict(&query(3, "09:00", "10:00", Some(5))).await.unwrap());
    }

    #[tokio::test]
    async fn inactive_entries_and_other_groups_are_ignored() {
        let repo = InMemorySchedulingRepository::new()
            .with_group(1, 10)
            .with_group(2, 10)
            .with_entry_status(5, 1, 1, time(9, 0), time(10, 0), LifecycleStatus::Inactive)
            .with_entry_status(6, 1, 1, time(9, 0), time(10, 0), LifecycleStatus::Suspended)
            .with_entry(7, 2, 1, time(9, 0), time(10, 0));
        let checker = ConflictChecker::new(&repo);

        assert!(!checker.has_conflict(&query(1, "09:00", "10:00", None)).await.unwrap());
    }
}
