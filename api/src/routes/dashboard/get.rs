use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use db::models::attendance_record::{self, AttendanceStatus, AttendanceTally};
use db::models::session::{self, SessionStatus, SessionTally};
use db::models::status::LifecycleStatus;
use db::models::{course, group, student, teacher, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use util::state::AppState;

use super::common::{
    GroupActivity, LimitQuery, MonthAttendance, MonthQuery, MostAbsentQuery, StudentAbsences,
    WeekAttendance, WeekQuery, clamp_limit, every_day, month_bounds, rank_absences, rank_groups,
    recorded_days, week_bounds,
};
use crate::response::ApiResponse;
use crate::routes::common::{DateRangeQuery, db_error, error_response, parse_optional_date};

#[derive(Debug, Serialize)]
pub struct Overview {
    pub date: NaiveDate,
    pub active_students: u64,
    pub active_teachers: u64,
    pub groups: u64,
    pub courses: u64,
    pub sessions_today: u64,
    pub attendance_today: AttendanceTally,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sessions: SessionTally,
    pub attendance: AttendanceTally,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<u64>,
    pub from: Option<String>,
}

/// Ids of sessions scheduled within `[from, to]`.
fn sessions_between(from: NaiveDate, to: NaiveDate) -> sea_orm::sea_query::SelectStatement {
    session::Entity::find()
        .select_only()
        .column(session::Column::Id)
        .filter(session::Column::ScheduledDate.between(from, to))
        .into_query()
}

fn active_user_ids() -> sea_orm::sea_query::SelectStatement {
    user::Entity::find()
        .select_only()
        .column(user::Column::Id)
        .filter(user::Column::Status.eq(LifecycleStatus::Active))
        .into_query()
}

async fn overview(db: &DatabaseConnection, today: NaiveDate) -> Result<Overview, DbErr> {
    let active_students = student::Entity::find()
        .filter(student::Column::UserId.in_subquery(active_user_ids()))
        .count(db)
        .await?;
    let active_teachers = teacher::Entity::find()
        .filter(teacher::Column::UserId.in_subquery(active_user_ids()))
        .count(db)
        .await?;
    let groups = group::Entity::find().count(db).await?;
    let courses = course::Entity::find().count(db).await?;
    let sessions_today = session::Entity::find()
        .filter(session::Column::ScheduledDate.eq(today))
        .count(db)
        .await?;
    let attendance_today = attendance_record::Model::tally(
        db,
        Condition::all()
            .add(attendance_record::Column::SessionId.in_subquery(sessions_between(today, today))),
    )
    .await?;

    Ok(Overview {
        date: today,
        active_students,
        active_teachers,
        groups,
        courses,
        sessions_today,
        attendance_today,
    })
}

/// GET /api/dashboard
///
/// Headline totals and today's attendance tally.
pub async fn get_overview(State(app_state): State<AppState>) -> Response {
    let today = Utc::now().date_naive();
    match overview(app_state.db(), today).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::success(data, "Dashboard retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to build dashboard", e),
    }
}

/// GET /api/dashboard/summary
///
/// Sessions and attendance per status over a period.
///
/// ### Query Parameters
/// - `from` (optional): Defaults to the first day of the current month
/// - `to` (optional): Defaults to today
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (malformed dates or `from` after `to`)
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let today = Utc::now().date_naive();
    let from = match parse_optional_date(query.from.as_deref(), "from") {
        Ok(d) => d.unwrap_or_else(|| today.with_day(1).unwrap_or(today)),
        Err(resp) => return resp,
    };
    let to = match parse_optional_date(query.to.as_deref(), "to") {
        Ok(d) => d.unwrap_or(today),
        Err(resp) => return resp,
    };
    if from > to {
        return error_response(StatusCode::BAD_REQUEST, "from must be on or before to");
    }
    let db = app_state.db();

    let statuses: Result<Vec<SessionStatus>, DbErr> = session::Entity::find()
        .select_only()
        .column(session::Column::Status)
        .filter(session::Column::ScheduledDate.between(from, to))
        .into_tuple()
        .all(db)
        .await;
    let sessions = match statuses {
        Ok(s) => SessionTally::from_statuses(s),
        Err(e) => return db_error("Failed to summarise sessions", e),
    };

    let attendance = match attendance_record::Model::tally(
        db,
        Condition::all()
            .add(attendance_record::Column::SessionId.in_subquery(sessions_between(from, to))),
    )
    .await
    {
        Ok(t) => t,
        Err(e) => return db_error("Failed to summarise attendance", e),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            Summary {
                from,
                to,
                sessions,
                attendance,
            },
            "Summary retrieved successfully",
        )),
    )
        .into_response()
}

/// GET /api/dashboard/upcoming
///
/// Next planned sessions by date, then start time.
///
/// ### Query Parameters
/// - `limit` (optional): Default 10, at most 50
/// - `from` (optional): First day to include, defaults to today
pub async fn list_upcoming(
    State(app_state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Response {
    let from = match parse_optional_date(query.from.as_deref(), "from") {
        Ok(d) => d.unwrap_or_else(|| Utc::now().date_naive()),
        Err(resp) => return resp,
    };
    let limit = clamp_limit(query.limit);

    let sessions = session::Entity::find()
        .filter(session::Column::Status.eq(SessionStatus::Planned))
        .filter(session::Column::ScheduledDate.gte(from))
        .order_by_asc(session::Column::ScheduledDate)
        .order_by_asc(session::Column::StartTime)
        .limit(limit)
        .all(app_state.db())
        .await;

    match sessions {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(sessions, "Upcoming sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list upcoming sessions", e),
    }
}

/// `(status, scheduled_date)` for every record whose session falls in `[from, to]`.
async fn dated_statuses(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(AttendanceStatus, NaiveDate)>, DbErr> {
    attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::Status)
        .column(session::Column::ScheduledDate)
        .inner_join(session::Entity)
        .filter(session::Column::ScheduledDate.between(from, to))
        .into_tuple()
        .all(db)
        .await
}

/// GET /api/dashboard/week
///
/// Attendance per day, Monday through Sunday, zero-filled.
///
/// ### Query Parameters
/// - `date` (optional): Any day of the wanted week, defaults to today
pub async fn get_week(State(app_state): State<AppState>, Query(query): Query<WeekQuery>) -> Response {
    let day = match parse_optional_date(query.date.as_deref(), "date") {
        Ok(d) => d.unwrap_or_else(|| Utc::now().date_naive()),
        Err(resp) => return resp,
    };
    let (from, to) = week_bounds(day);

    match dated_statuses(app_state.db(), from, to).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                WeekAttendance {
                    from,
                    to,
                    days: every_day(&rows, from, to),
                },
                "Weekly attendance retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to load weekly attendance", e),
    }
}

/// GET /api/dashboard/month
///
/// Attendance tally for a calendar month plus one tally per day with records.
///
/// ### Query Parameters
/// - `month` (optional): 1..12, defaults to the current month
/// - `year` (optional): Defaults to the current year
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (month outside 1..12)
pub async fn get_month(
    State(app_state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let today = Utc::now().date_naive();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());
    let Some((from, to)) = month_bounds(year, month) else {
        return error_response(StatusCode::BAD_REQUEST, "month must be between 1 and 12");
    };

    match dated_statuses(app_state.db(), from, to).await {
        Ok(rows) => {
            let summary = AttendanceTally::from_statuses(rows.iter().map(|(s, _)| *s));
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    MonthAttendance {
                        month,
                        year,
                        from,
                        to,
                        summary,
                        days: recorded_days(&rows),
                    },
                    "Monthly attendance retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to load monthly attendance", e),
    }
}

/// GET /api/dashboard/active-groups
///
/// Groups ordered by the number of sessions with recorded attendance.
///
/// ### Query Parameters
/// - `limit` (optional): Default 10, at most 50
pub async fn list_active_groups(
    State(app_state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = clamp_limit(query.limit);
    match active_groups(app_state.db(), limit).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Active groups retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to rank groups", e),
    }
}

async fn active_groups(db: &DatabaseConnection, limit: u64) -> Result<Vec<GroupActivity>, DbErr> {
    let rows: Vec<(i64, i64, AttendanceStatus)> = attendance_record::Entity::find()
        .select_only()
        .column(session::Column::GroupId)
        .column(attendance_record::Column::SessionId)
        .column(attendance_record::Column::Status)
        .inner_join(session::Entity)
        .into_tuple()
        .all(db)
        .await?;
    let mut ranked = rank_groups(&rows, limit);

    let groups: HashMap<i64, group::Model> = group::Entity::find()
        .filter(group::Column::Id.is_in(ranked.iter().map(|g| g.group_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let courses: HashMap<i64, String> = course::Entity::find()
        .filter(course::Column::Id.is_in(groups.values().map(|g| g.course_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    for item in &mut ranked {
        if let Some(g) = groups.get(&item.group_id) {
            item.group_name = Some(g.name.clone());
            item.course_name = courses.get(&g.course_id).cloned();
        }
    }
    Ok(ranked)
}

/// GET /api/dashboard/most-absent
///
/// Students ordered by absence count.
///
/// ### Query Parameters
/// - `limit` (optional): Default 10, at most 50
/// - `from`, `to` (optional): Inclusive session date range, `YYYY-MM-DD`
pub async fn list_most_absent(
    State(app_state): State<AppState>,
    Query(query): Query<MostAbsentQuery>,
) -> Response {
    let range = DateRangeQuery {
        from: query.from,
        to: query.to,
    };
    let (from, to) = match range.parse() {
        Ok(bounds) => bounds,
        Err(resp) => return resp,
    };
    let limit = clamp_limit(query.limit);

    match most_absent(app_state.db(), from, to, limit).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Students retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to rank absences", e),
    }
}

async fn most_absent(
    db: &DatabaseConnection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: u64,
) -> Result<Vec<StudentAbsences>, DbErr> {
    let mut query = attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::StudentId)
        .column(attendance_record::Column::Status)
        .inner_join(session::Entity);
    if let Some(from) = from {
        query = query.filter(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(session::Column::ScheduledDate.lte(to));
    }
    let rows: Vec<(i64, AttendanceStatus)> = query.into_tuple().all(db).await?;
    let mut ranked = rank_absences(&rows, limit);

    let students: HashMap<i64, student::Model> = student::Entity::find()
        .filter(student::Column::Id.is_in(ranked.iter().map(|s| s.student_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let names: HashMap<i64, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(students.values().map(|s| s.user_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();

    for item in &mut ranked {
        if let Some(s) = students.get(&item.student_id) {
            item.student_code = Some(s.student_code.clone());
            item.full_name = names.get(&s.user_id).cloned();
        }
    }
    Ok(ranked)
}
