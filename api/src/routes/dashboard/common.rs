use chrono::{Datelike, Days, NaiveDate};
use db::models::attendance_record::{AttendanceStatus, AttendanceTally, percentage};
use db::models::timetable_entry::weekday_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 50;

pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any day of the wanted week; defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MostAbsentQuery {
    pub limit: Option<u64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayTally {
    pub date: NaiveDate,
    pub weekday_name: &'static str,
    #[serde(flatten)]
    pub tally: AttendanceTally,
}

#[derive(Debug, Serialize)]
pub struct WeekAttendance {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<DayTally>,
}

#[derive(Debug, Serialize)]
pub struct MonthAttendance {
    pub month: u32,
    pub year: i32,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub summary: AttendanceTally,
    /// Only days that have records.
    pub days: Vec<DayTally>,
}

#[derive(Debug, Serialize)]
pub struct GroupActivity {
    pub group_id: i64,
    pub group_name: Option<String>,
    pub course_name: Option<String>,
    /// Distinct sessions with at least one record.
    pub sessions: u64,
    #[serde(flatten)]
    pub tally: AttendanceTally,
}

#[derive(Debug, Serialize)]
pub struct StudentAbsences {
    pub student_id: i64,
    pub student_code: Option<String>,
    pub full_name: Option<String>,
    pub absences: u64,
    pub lates: u64,
    pub records: u64,
    /// `absences / records * 100`, two decimals.
    pub absence_rate: f64,
}

/// Monday and Sunday of the ISO week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(day.weekday().num_days_from_monday());
    let monday = day - Days::new(offset);
    (monday, monday + Days::new(6))
}

/// First and last day of `month` in `year`, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

fn day_tally(date: NaiveDate, statuses: Vec<AttendanceStatus>) -> DayTally {
    DayTally {
        date,
        weekday_name: weekday_name(date.weekday().number_from_monday() as i32).unwrap_or("Unknown"),
        tally: AttendanceTally::from_statuses(statuses),
    }
}

fn by_day(rows: &[(AttendanceStatus, NaiveDate)]) -> BTreeMap<NaiveDate, Vec<AttendanceStatus>> {
    let mut days: BTreeMap<NaiveDate, Vec<AttendanceStatus>> = BTreeMap::new();
    for (status, date) in rows {
        days.entry(*date).or_default().push(*status);
    }
    days
}

/// One tally per day of `[from, to]`, zero-filled.
pub fn every_day(rows: &[(AttendanceStatus, NaiveDate)], from: NaiveDate, to: NaiveDate) -> Vec<DayTally> {
    let mut days = by_day(rows);
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| day_tally(d, days.remove(&d).unwrap_or_default()))
        .collect()
}

/// One tally per day that has records, oldest first.
pub fn recorded_days(rows: &[(AttendanceStatus, NaiveDate)]) -> Vec<DayTally> {
    by_day(rows)
        .into_iter()
        .map(|(date, statuses)| day_tally(date, statuses))
        .collect()
}

/// Per-group activity from `(group_id, session_id, status)` rows, busiest first.
///
/// Names are left empty for the caller to fill in.
pub fn rank_groups(rows: &[(i64, i64, AttendanceStatus)], limit: u64) -> Vec<GroupActivity> {
    let mut sessions: HashMap<i64, HashSet<i64>> = HashMap::new();
    let mut statuses: HashMap<i64, Vec<AttendanceStatus>> = HashMap::new();
    for (group_id, session_id, status) in rows {
        sessions.entry(*group_id).or_default().insert(*session_id);
        statuses.entry(*group_id).or_default().push(*status);
    }

    let mut ranked: Vec<GroupActivity> = statuses
        .into_iter()
        .map(|(group_id, list)| GroupActivity {
            group_id,
            group_name: None,
            course_name: None,
            sessions: sessions.get(&group_id).map_or(0, |s| s.len() as u64),
            tally: AttendanceTally::from_statuses(list),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.sessions
            .cmp(&a.sessions)
            .then_with(|| b.tally.total.cmp(&a.tally.total))
            .then_with(|| a.group_id.cmp(&b.group_id))
    });
    ranked.truncate(limit as usize);
    ranked
}

/// Per-student absence counts from `(student_id, status)` rows, most absent first.
pub fn rank_absences(rows: &[(i64, AttendanceStatus)], limit: u64) -> Vec<StudentAbsences> {
    let mut counts: HashMap<i64, (u64, u64, u64)> = HashMap::new();
    for (student_id, status) in rows {
        let entry = counts.entry(*student_id).or_default();
        match status {
            AttendanceStatus::Absent => entry.0 += 1,
            AttendanceStatus::Late => entry.1 += 1,
            _ => {}
        }
        entry.2 += 1;
    }

    let mut ranked: Vec<StudentAbsences> = counts
        .into_iter()
        .map(|(student_id, (absences, lates, records))| StudentAbsences {
            student_id,
            student_code: None,
            full_name: None,
            absences,
            lates,
            records,
            absence_rate: percentage(absences, records),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.absences
            .cmp(&a.absences)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
    ranked.truncate(limit as usize);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2025-01-01 is a Wednesday
        assert_eq!(week_bounds(date(2025, 1, 1)), (date(2024, 12, 30), date(2025, 1, 5)));
        assert_eq!(week_bounds(date(2025, 1, 6)), (date(2025, 1, 6), date(2025, 1, 12)));
    }

    #[test]
    fn month_bounds_handle_leap_years_and_december() {
        assert_eq!(month_bounds(2024, 2), Some((date(2024, 2, 1), date(2024, 2, 29))));
        assert_eq!(month_bounds(2025, 12), Some((date(2025, 12, 1), date(2025, 12, 31))));
        assert_eq!(month_bounds(2025, 13), None);
        assert_eq!(month_bounds(2025, 0), None);
    }

    #[test]
    fn every_day_zero_fills_the_week() {
        let rows = [(Present, date(2025, 1, 1)), (Absent, date(2025, 1, 1)), (Late, date(2025, 1, 3))];
        let days = every_day(&rows, date(2024, 12, 30), date(2025, 1, 5));

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].weekday_name, "Monday");
        assert_eq!(days[0].tally.total, 0);
        assert_eq!(days[2].tally.total, 2);
        assert_eq!(days[2].tally.attendance_rate, 50.0);
        assert_eq!(days[4].tally.late, 1);
    }

    #[test]
    fn recorded_days_skips_empty_dates() {
        let rows = [(Present, date(2025, 1, 10)), (Present, date(2025, 1, 2))];
        let days = recorded_days(&rows);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2025, 1, 2));
    }

    #[test]
    fn groups_rank_by_distinct_sessions() {
        let rows = [
            (1, 10, Present),
            (1, 10, Absent),
            (1, 10, Present),
            (2, 20, Present),
            (2, 21, Late),
        ];
        let ranked = rank_groups(&rows, 10);
        assert_eq!(ranked[0].group_id, 2);
        assert_eq!(ranked[0].sessions, 2);
        assert_eq!(ranked[0].tally.attendance_rate, 100.0);
        assert_eq!(ranked[1].tally.total, 3);

        assert_eq!(rank_groups(&rows, 1).len(), 1);
    }

    #[test]
    fn students_rank_by_absences() {
        let rows = [(1, Absent), (1, Present), (2, Absent), (2, Absent), (2, Late), (3, Present)];
        let ranked = rank_absences(&rows, 10);
        assert_eq!(ranked[0].student_id, 2);
        assert_eq!(ranked[0].absences, 2);
        assert_eq!(ranked[0].lates, 1);
        assert_eq!(ranked[0].absence_rate, 66.67);
        assert_eq!(ranked[2].student_id, 3);
        assert_eq!(ranked[2].absence_rate, 0.0);
    }
}
