use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record;
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::session::{self, SessionStatus, SessionTally};
use db::models::{course, group, student, teacher, timetable_entry};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use util::state::AppState;

use super::common::{GroupDetail, GroupFilters, GroupSessionFilters, GroupStats};
use crate::response::ApiResponse;
use crate::routes::attendance::common::group_report;
use crate::routes::common::{
    DateRangeQuery, ListParams, apply_sort, db_error, fetch_page, not_found, parse_optional_date,
};
use crate::routes::students::common::with_users;
use crate::routes::timetables::common::TimetableItem;

async fn find_group(db: &DatabaseConnection, group_id: i64) -> Result<Option<group::Model>, DbErr> {
    group::Entity::find_by_id(group_id).one(db).await
}

/// GET /api/groups
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`name`, `academic_year`, `created_at`)
/// - `q` (optional): Partial match on name or classroom
/// - `course_id`, `teacher_id`, `academic_year` (optional)
pub async fn list_groups(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<GroupFilters>,
) -> Response {
    let mut condition = Condition::all();
    if let Some(q) = params.search() {
        condition = condition.add(
            Condition::any()
                .add(group::Column::Name.contains(&q))
                .add(group::Column::Classroom.contains(&q)),
        );
    }
    if let Some(course_id) = filters.course_id {
        condition = condition.add(group::Column::CourseId.eq(course_id));
    }
    if let Some(teacher_id) = filters.teacher_id {
        condition = condition.add(group::Column::TeacherId.eq(teacher_id));
    }
    if let Some(year) = filters.academic_year {
        condition = condition.add(group::Column::AcademicYear.eq(year));
    }

    let query = apply_sort(
        group::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["name", "academic_year", "created_at"],
        group::Column::Name,
    );

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Groups retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list groups", e),
    }
}

/// GET /api/groups/{group_id}
///
/// The group with its course and teacher.
pub async fn get_group(State(app_state): State<AppState>, Path(group_id): Path<i64>) -> Response {
    let db = app_state.db();
    let group = match find_group(db, group_id).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    let course = match course::Entity::find_by_id(group.course_id).one(db).await {
        Ok(c) => c,
        Err(e) => return db_error("Failed to load group course", e),
    };
    let teacher = match group.teacher_id {
        Some(id) => match teacher::Entity::find_by_id(id).one(db).await {
            Ok(t) => t,
            Err(e) => return db_error("Failed to load group teacher", e),
        },
        None => None,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            GroupDetail {
                group,
                course,
                teacher,
            },
            "Group retrieved successfully",
        )),
    )
        .into_response()
}

/// GET /api/groups/{group_id}/students
///
/// Students with an active enrollment in the group, ordered by code.
pub async fn list_group_students(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match find_group(db, group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let enrolled = enrollment::Entity::find()
        .select_only()
        .column(enrollment::Column::StudentId)
        .filter(enrollment::Column::GroupId.eq(group_id))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
        .into_query();

    let students = match student::Entity::find()
        .filter(student::Column::Id.in_subquery(enrolled))
        .order_by_asc(student::Column::StudentCode)
        .all(db)
        .await
    {
        Ok(s) => s,
        Err(e) => return db_error("Failed to list group students", e),
    };

    match with_users(db, students).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Students retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to load student users", e),
    }
}

/// GET /api/groups/{group_id}/timetable
///
/// Every timetable entry of the group ordered by weekday, then start time.
pub async fn list_group_timetable(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match find_group(db, group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let entries = timetable_entry::Entity::find()
        .filter(timetable_entry::Column::GroupId.eq(group_id))
        .order_by_asc(timetable_entry::Column::Weekday)
        .order_by_asc(timetable_entry::Column::StartTime)
        .all(db)
        .await;

    match entries {
        Ok(entries) => {
            let items: Vec<TimetableItem> = entries.into_iter().map(TimetableItem::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(items, "Timetable retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list group timetable", e),
    }
}

/// GET /api/groups/{group_id}/sessions
///
/// ### Query Parameters
/// - `from`, `to` (optional): Inclusive date range, `YYYY-MM-DD`
/// - `status` (optional): `planned`, `held` or `cancelled`
pub async fn list_group_sessions(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(filters): Query<GroupSessionFilters>,
) -> Response {
    let from = match parse_optional_date(filters.from.as_deref(), "from") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let to = match parse_optional_date(filters.to.as_deref(), "to") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let db = app_state.db();
    match find_group(db, group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let mut query = session::Entity::find().filter(session::Column::GroupId.eq(group_id));
    if let Some(from) = from {
        query = query.filter(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(session::Column::ScheduledDate.lte(to));
    }
    if let Some(status) = filters.status {
        query = query.filter(session::Column::Status.eq(status));
    }

    let sessions = query
        .order_by_asc(session::Column::ScheduledDate)
        .order_by_asc(session::Column::StartTime)
        .all(db)
        .await;

    match sessions {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(sessions, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list group sessions", e),
    }
}

/// GET /api/groups/{group_id}/attendance
///
/// Attendance records of the group's sessions, newest session first, then by
/// student name. Each row carries the session slot and the student's code and name.
///
/// ### Query Parameters
/// - `from`, `to` (optional): Inclusive session date range, `YYYY-MM-DD`
pub async fn list_group_attendance(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let (from, to) = match range.parse() {
        Ok(bounds) => bounds,
        Err(resp) => return resp,
    };
    let db = app_state.db();
    match find_group(db, group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    match group_report(db, group_id, from, to).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Attendance retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list group attendance", e),
    }
}

/// GET /api/groups/{group_id}/stats
///
/// Seats, timetable size, sessions per status and the attendance tally over
/// every session of the group.
pub async fn get_group_stats(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let group = match find_group(db, group_id).await {
        Ok(Some(g)) => g,
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    };

    match group_stats(db, &group).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Group statistics retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute group statistics", e),
    }
}

async fn group_stats(db: &DatabaseConnection, group: &group::Model) -> Result<GroupStats, DbErr> {
    let capacity = enrollment::Model::capacity(db, group).await?;
    let timetable_entries = timetable_entry::Entity::find()
        .filter(timetable_entry::Column::GroupId.eq(group.id))
        .count(db)
        .await?;

    let statuses: Vec<SessionStatus> = session::Entity::find()
        .select_only()
        .column(session::Column::Status)
        .filter(session::Column::GroupId.eq(group.id))
        .into_tuple()
        .all(db)
        .await?;
    let sessions = SessionTally::from_statuses(statuses);

    let session_ids = session::Entity::find()
        .select_only()
        .column(session::Column::Id)
        .filter(session::Column::GroupId.eq(group.id))
        .into_query();
    let attendance = attendance_record::Model::tally(
        db,
        Condition::all().add(attendance_record::Column::SessionId.in_subquery(session_ids)),
    )
    .await?;

    Ok(GroupStats {
        group_id: group.id,
        capacity,
        timetable_entries,
        sessions,
        attendance,
    })
}
