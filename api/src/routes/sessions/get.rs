use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record;
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::{session, student, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use std::collections::HashMap;
use util::state::AppState;

use super::common::{SessionAttendanceRow, SessionFilters, SessionStats, SessionStudent};
use crate::response::ApiResponse;
use crate::routes::common::{
    ListParams, db_error, fetch_page, not_found, parse_date, parse_optional_date,
};

async fn find_session(db: &DatabaseConnection, session_id: i64) -> Result<Option<session::Model>, DbErr> {
    session::Entity::find_by_id(session_id).one(db).await
}

/// GET /api/sessions
///
/// Sessions ordered by date, then start time.
///
/// ### Query Parameters
/// - `page`, `per_page`
/// - `group_id`, `course_id`, `status` (optional)
/// - `from`, `to` (optional): Inclusive date range, `YYYY-MM-DD`
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<SessionFilters>,
) -> Response {
    let from = match parse_optional_date(filters.from.as_deref(), "from") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let to = match parse_optional_date(filters.to.as_deref(), "to") {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let mut condition = Condition::all();
    if let Some(group_id) = filters.group_id {
        condition = condition.add(session::Column::GroupId.eq(group_id));
    }
    if let Some(course_id) = filters.course_id {
        condition = condition.add(session::Column::CourseId.eq(course_id));
    }
    if let Some(status) = filters.status {
        condition = condition.add(session::Column::Status.eq(status));
    }
    if let Some(from) = from {
        condition = condition.add(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        condition = condition.add(session::Column::ScheduledDate.lte(to));
    }

    let query = session::Entity::find()
        .filter(condition)
        .order_by_asc(session::Column::ScheduledDate)
        .order_by_asc(session::Column::StartTime);

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list sessions", e),
    }
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    match find_session(app_state.db(), session_id).await {
        Ok(Some(s)) => (
            StatusCode::OK,
            Json(ApiResponse::success(s, "Session retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Session"),
        Err(e) => db_error("Failed to load session", e),
    }
}

/// GET /api/sessions/date/{date}
///
/// Every session on `date` (`YYYY-MM-DD`) ordered by start time.
pub async fn list_sessions_by_date(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
) -> Response {
    let date = match parse_date(&date, "date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let sessions = session::Entity::find()
        .filter(session::Column::ScheduledDate.eq(date))
        .order_by_asc(session::Column::StartTime)
        .order_by_asc(session::Column::GroupId)
        .all(app_state.db())
        .await;

    match sessions {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(sessions, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list sessions by date", e),
    }
}

/// GET /api/sessions/{session_id}/attendance
///
/// Attendance records of the session with their students.
pub async fn list_session_attendance(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match find_session(db, session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Session"),
        Err(e) => return db_error("Failed to load session", e),
    }

    let rows = attendance_record::Entity::find()
        .filter(attendance_record::Column::SessionId.eq(session_id))
        .order_by_asc(attendance_record::Column::StudentId)
        .find_also_related(student::Entity)
        .all(db)
        .await;

    match rows {
        Ok(rows) => {
            let items: Vec<SessionAttendanceRow> = rows
                .into_iter()
                .map(|(record, student)| SessionAttendanceRow { record, student })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(items, "Attendance retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list session attendance", e),
    }
}

/// GET /api/sessions/{session_id}/stats
///
/// Counts per status, the attendance percentage and how many actively
/// enrolled students have no record yet.
pub async fn get_session_stats(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let session = match find_session(db, session_id).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Session"),
        Err(e) => return db_error("Failed to load session", e),
    };

    let tally = match attendance_record::Model::tally_for_session(db, session_id).await {
        Ok(t) => t,
        Err(e) => return db_error("Failed to compute session attendance", e),
    };
    let enrolled_students = match enrollment::Model::active_count(db, session.group_id).await {
        Ok(n) => n,
        Err(e) => return db_error("Failed to count enrolled students", e),
    };

    let stats = SessionStats {
        session_id,
        total: tally.total,
        present: tally.present,
        absent: tally.absent,
        late: tally.late,
        excused: tally.excused,
        attendance_percentage: tally.attendance_rate,
        enrolled_students,
        unrecorded: enrolled_students.saturating_sub(tally.total),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(stats, "Session statistics retrieved successfully")),
    )
        .into_response()
}

/// GET /api/sessions/{session_id}/students
///
/// Actively enrolled students of the session's group, each with their
/// attendance record for this session when one exists.
pub async fn list_session_students(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let session = match find_session(db, session_id).await {
        Ok(Some(s)) => s,
        Ok(None) => return not_found("Session"),
        Err(e) => return db_error("Failed to load session", e),
    };

    match session_students(db, &session).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Students retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list session students", e),
    }
}

async fn session_students(
    db: &DatabaseConnection,
    session: &session::Model,
) -> Result<Vec<SessionStudent>, DbErr> {
    let enrolled = enrollment::Entity::find()
        .select_only()
        .column(enrollment::Column::StudentId)
        .filter(enrollment::Column::GroupId.eq(session.group_id))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
        .into_query();

    let students = student::Entity::find()
        .filter(student::Column::Id.in_subquery(enrolled))
        .order_by_asc(student::Column::StudentCode)
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    let mut records: HashMap<i64, attendance_record::Model> = attendance_record::Entity::find()
        .filter(attendance_record::Column::SessionId.eq(session.id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r))
        .collect();

    Ok(students
        .into_iter()
        .map(|(student, user)| SessionStudent {
            attendance: records.remove(&student.id),
            full_name: user.map(|u| u.full_name),
            student,
        })
        .collect())
}
