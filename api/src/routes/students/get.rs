use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record::{self, AttendanceTally};
use db::models::{enrollment, group, session, student, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use util::state::AppState;

use super::common::{
    StudentAttendanceFilters, StudentEnrollment, StudentFilters, StudentStatsQuery, with_users,
};
use crate::response::ApiResponse;
use crate::routes::attendance::common::with_sessions;
use crate::routes::common::{
    ListParams, Page, apply_sort, db_error, fetch_page, not_found, parse_optional_date,
};

async fn find_student(db: &DatabaseConnection, student_id: i64) -> Result<Option<student::Model>, DbErr> {
    student::Entity::find_by_id(student_id).one(db).await
}

/// GET /api/students
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`student_code`, `created_at`)
/// - `q` (optional): Partial match on code, full name or email
/// - `gender` (optional): `M`, `F` or `O`
/// - `group_id` (optional): Only students enrolled in the group
pub async fn list_students(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<StudentFilters>,
) -> Response {
    let db = app_state.db();
    let mut condition = Condition::all();

    if let Some(q) = params.search() {
        let matching_users = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(
                Condition::any()
                    .add(user::Column::FullName.contains(&q))
                    .add(user::Column::Email.contains(&q)),
            )
            .into_query();
        condition = condition.add(
            Condition::any()
                .add(student::Column::StudentCode.contains(&q))
                .add(student::Column::UserId.in_subquery(matching_users)),
        );
    }
    if let Some(gender) = filters.gender {
        condition = condition.add(student::Column::Gender.eq(gender));
    }
    if let Some(group_id) = filters.group_id {
        let enrolled = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::StudentId)
            .filter(enrollment::Column::GroupId.eq(group_id))
            .into_query();
        condition = condition.add(student::Column::Id.in_subquery(enrolled));
    }

    let query = apply_sort(
        student::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["student_code", "created_at"],
        student::Column::StudentCode,
    );

    let Page {
        items,
        page,
        per_page,
        total,
    } = match fetch_page(db, query, &params).await {
        Ok(page) => page,
        Err(e) => return db_error("Failed to list students", e),
    };

    match with_users(db, items).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Page {
                    items,
                    page,
                    per_page,
                    total,
                },
                "Students retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to load student users", e),
    }
}

async fn respond_with_student(db: &DatabaseConnection, found: student::Model) -> Response {
    match with_users(db, vec![found]).await {
        Ok(mut list) => match list.pop() {
            Some(item) => (
                StatusCode::OK,
                Json(ApiResponse::success(item, "Student retrieved successfully")),
            )
                .into_response(),
            None => not_found("Student"),
        },
        Err(e) => db_error("Failed to load student user", e),
    }
}

/// GET /api/students/{student_id}
pub async fn get_student(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match find_student(db, student_id).await {
        Ok(Some(s)) => respond_with_student(db, s).await,
        Ok(None) => not_found("Student"),
        Err(e) => db_error("Failed to load student", e),
    }
}

/// GET /api/students/code/{code}
pub async fn get_student_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    let db = app_state.db();
    let found = student::Entity::find()
        .filter(student::Column::StudentCode.eq(code.trim()))
        .one(db)
        .await;
    match found {
        Ok(Some(s)) => respond_with_student(db, s).await,
        Ok(None) => not_found("Student"),
        Err(e) => db_error("Failed to load student", e),
    }
}

/// GET /api/students/{student_id}/enrollments
///
/// Every enrollment of the student, newest first, with its group.
pub async fn list_student_enrollments(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match find_student(db, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    }

    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .order_by_desc(enrollment::Column::EnrolledAt)
        .find_also_related(group::Entity)
        .all(db)
        .await;

    match rows {
        Ok(rows) => {
            let items: Vec<StudentEnrollment> = rows
                .into_iter()
                .map(|(enrollment, group)| StudentEnrollment { enrollment, group })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(items, "Enrollments retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => db_error("Failed to list student enrollments", e),
    }
}

/// Restricts attendance records to sessions of `group_id` within `[from, to]`.
fn session_scope(
    group_id: Option<i64>,
    from: Option<chrono::NaiveDate>,
    to: Option<chrono::NaiveDate>,
) -> Option<Condition> {
    if group_id.is_none() && from.is_none() && to.is_none() {
        return None;
    }
    let mut sessions = session::Entity::find()
        .select_only()
        .column(session::Column::Id);
    if let Some(group_id) = group_id {
        sessions = sessions.filter(session::Column::GroupId.eq(group_id));
    }
    if let Some(from) = from {
        sessions = sessions.filter(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        sessions = sessions.filter(session::Column::ScheduledDate.lte(to));
    }
    Some(Condition::all().add(attendance_record::Column::SessionId.in_subquery(sessions.into_query())))
}

/// GET /api/students/{student_id}/attendance
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`recorded_at`, `status`)
/// - `from`, `to` (optional): Session date range, `YYYY-MM-DD`
/// - `group_id` (optional)
/// - `status` (optional): `present`, `absent`, `late` or `excused`
pub async fn list_student_attendance(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<ListParams>,
    Query(filters): Query<StudentAttendanceFilters>,
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
    match find_student(db, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    }

    let mut condition =
        Condition::all().add(attendance_record::Column::StudentId.eq(student_id));
    if let Some(status) = filters.status {
        condition = condition.add(attendance_record::Column::Status.eq(status));
    }
    if let Some(scope) = session_scope(filters.group_id, from, to) {
        condition = condition.add(scope);
    }

    let query = apply_sort(
        attendance_record::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["recorded_at", "status"],
        attendance_record::Column::RecordedAt,
    );

    let Page {
        items,
        page,
        per_page,
        total,
    } = match fetch_page(db, query, &params).await {
        Ok(page) => page,
        Err(e) => return db_error("Failed to list student attendance", e),
    };

    match with_sessions(db, items).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Page {
                    items,
                    page,
                    per_page,
                    total,
                },
                "Attendance retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to load attendance sessions", e),
    }
}

#[derive(Debug, Serialize)]
pub struct StudentAttendanceStats {
    pub student_id: i64,
    pub group_id: Option<i64>,
    #[serde(flatten)]
    pub tally: AttendanceTally,
    /// Tallies per group the student has records in.
    pub by_group: HashMap<i64, AttendanceTally>,
}

/// GET /api/students/{student_id}/attendance/stats
///
/// ### Query Parameters
/// - `group_id` (optional): Restrict the overall tally to one group
pub async fn get_student_attendance_stats(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<StudentStatsQuery>,
) -> Response {
    let db = app_state.db();
    match find_student(db, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Student"),
        Err(e) => return db_error("Failed to load student", e),
    }

    let rows: Result<Vec<(attendance_record::AttendanceStatus, i64)>, DbErr> =
        attendance_record::Entity::find()
            .select_only()
            .column(attendance_record::Column::Status)
            .column(session::Column::GroupId)
            .inner_join(session::Entity)
            .filter(attendance_record::Column::StudentId.eq(student_id))
            .into_tuple()
            .all(db)
            .await;

    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => return db_error("Failed to compute student attendance", e),
    };

    let mut grouped: HashMap<i64, Vec<attendance_record::AttendanceStatus>> = HashMap::new();
    for (status, group_id) in &rows {
        grouped.entry(*group_id).or_default().push(*status);
    }
    let by_group = grouped
        .into_iter()
        .map(|(group_id, statuses)| (group_id, AttendanceTally::from_statuses(statuses)))
        .collect();
    let tally = AttendanceTally::from_statuses(
        rows.iter()
            .filter(|(_, g)| query.group_id.is_none_or(|wanted| wanted == *g))
            .map(|(status, _)| *status),
    );

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            StudentAttendanceStats {
                student_id,
                group_id: query.group_id,
                tally,
                by_group,
            },
            "Attendance statistics retrieved successfully",
        )),
    )
        .into_response()
}
