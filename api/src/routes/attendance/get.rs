use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record::{self, AttendanceTally};
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::{group, session, student};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, QueryTrait,
};
use util::state::AppState;

use super::common::{
    AttendanceFilters, GroupAttendanceStats, GroupReport, StatsQuery, StudentStats, group_report,
};
use crate::response::ApiResponse;
use crate::routes::common::{
    DateRangeQuery, ListParams, apply_sort, db_error, fetch_page, not_found,
};

/// GET /api/attendance
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`recorded_at`, `status`, `student_id`)
/// - `session_id`, `student_id`, `status` (optional)
pub async fn list_attendance(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<AttendanceFilters>,
) -> Response {
    let mut condition = Condition::all();
    if let Some(session_id) = filters.session_id {
        condition = condition.add(attendance_record::Column::SessionId.eq(session_id));
    }
    if let Some(student_id) = filters.student_id {
        condition = condition.add(attendance_record::Column::StudentId.eq(student_id));
    }
    if let Some(status) = filters.status {
        condition = condition.add(attendance_record::Column::Status.eq(status));
    }

    let query = apply_sort(
        attendance_record::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["recorded_at", "status", "student_id"],
        attendance_record::Column::RecordedAt,
    );

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Attendance retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list attendance", e),
    }
}

/// GET /api/attendance/{attendance_id}
pub async fn get_attendance(
    State(app_state): State<AppState>,
    Path(attendance_id): Path<i64>,
) -> Response {
    match attendance_record::Entity::find_by_id(attendance_id)
        .one(app_state.db())
        .await
    {
        Ok(Some(r)) => (
            StatusCode::OK,
            Json(ApiResponse::success(r, "Attendance record retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Attendance record"),
        Err(e) => db_error("Failed to load attendance record", e),
    }
}

/// GET /api/attendance/student/{student_id}/stats
///
/// ### Query Parameters
/// - `group_id` (optional): Only sessions of this group
pub async fn get_student_stats(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<StatsQuery>,
) -> Response {
    let db = app_state.db();
    match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    }

    let mut condition =
        Condition::all().add(attendance_record::Column::StudentId.eq(student_id));
    if let Some(group_id) = query.group_id {
        let sessions = session::Entity::find()
            .select_only()
            .column(session::Column::Id)
            .filter(session::Column::GroupId.eq(group_id))
            .into_query();
        condition = condition.add(attendance_record::Column::SessionId.in_subquery(sessions));
    }

    match attendance_record::Model::tally(db, condition).await {
        Ok(tally) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StudentStats {
                    student_id,
                    group_id: query.group_id,
                    tally,
                },
                "Attendance statistics retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute attendance statistics", e),
    }
}

/// GET /api/attendance/report/group/{group_id}
///
/// Every record of the group's sessions with the session slot, student and
/// absence reason, plus a tally over the same rows.
///
/// ### Query Parameters
/// - `from`, `to` (optional): Inclusive session date range, `YYYY-MM-DD`
pub async fn get_group_report(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let (from, to) = match range.parse() {
        Ok(bounds) => bounds,
        Err(resp) => return resp,
    };
    let db = app_state.db();
    match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    match group_report(db, group_id, from, to).await {
        Ok(records) => {
            let summary = AttendanceTally::from_statuses(records.iter().map(|r| r.record.status));
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    GroupReport {
                        group_id,
                        from,
                        to,
                        summary,
                        records,
                    },
                    "Attendance report retrieved successfully",
                )),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to build group report", e),
    }
}

/// GET /api/attendance/stats/group/{group_id}
///
/// Active enrollment count and the attendance tally over all of the group's sessions.
pub async fn get_group_stats(
    State(app_state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match group::Entity::find_by_id(group_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Group"),
        Err(e) => return db_error("Failed to load group", e),
    }

    let active_students = match enrollment::Entity::find()
        .filter(enrollment::Column::GroupId.eq(group_id))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
        .count(db)
        .await
    {
        Ok(n) => n,
        Err(e) => return db_error("Failed to count group students", e),
    };

    let sessions = session::Entity::find()
        .select_only()
        .column(session::Column::Id)
        .filter(session::Column::GroupId.eq(group_id))
        .into_query();
    match attendance_record::Model::tally(
        db,
        Condition::all().add(attendance_record::Column::SessionId.in_subquery(sessions)),
    )
    .await
    {
        Ok(tally) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                GroupAttendanceStats {
                    group_id,
                    active_students,
                    tally,
                },
                "Attendance statistics retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute group attendance", e),
    }
}
