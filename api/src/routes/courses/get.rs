use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record;
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::{course, group, session, student, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use std::collections::HashMap;
use util::state::AppState;

use super::common::{CourseStats, CourseStudent};
use crate::response::ApiResponse;
use crate::routes::common::{
    DateRangeQuery, ListParams, apply_sort, db_error, fetch_page, not_found,
};
use crate::routes::sessions::common::with_names;

/// GET /api/courses
///
/// Paginated course list.
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`code`, `name`, `created_at`)
/// - `q` (optional): Partial match on code or name
///
/// ### Responses
/// - `200 OK` with `{ items, page, per_page, total }`
pub async fn list_courses(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let mut query = course::Entity::find();
    if let Some(q) = params.search() {
        query = query.filter(
            Condition::any()
                .add(course::Column::Code.contains(&q))
                .add(course::Column::Name.contains(&q)),
        );
    }
    let query = apply_sort(
        query,
        params.sort.as_deref(),
        &["code", "name", "created_at"],
        course::Column::Code,
    );

    match fetch_page(app_state.db(), query, &params).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ApiResponse::success(page, "Courses retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list courses", e),
    }
}

/// GET /api/courses/{course_id}
pub async fn get_course(State(app_state): State<AppState>, Path(course_id): Path<i64>) -> Response {
    match course::Entity::find_by_id(course_id).one(app_state.db()).await {
        Ok(Some(c)) => (
            StatusCode::OK,
            Json(ApiResponse::success(c, "Course retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Course"),
        Err(e) => db_error("Failed to load course", e),
    }
}

/// GET /api/courses/code/{code}
///
/// Case-insensitive lookup by course code.
pub async fn get_course_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match course::Model::find_by_code(app_state.db(), &code).await {
        Ok(Some(c)) => (
            StatusCode::OK,
            Json(ApiResponse::success(c, "Course retrieved successfully")),
        )
            .into_response(),
        Ok(None) => not_found("Course"),
        Err(e) => db_error("Failed to load course", e),
    }
}

/// GET /api/courses/{course_id}/groups
///
/// All groups of the course, newest academic year first.
pub async fn list_course_groups(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match course::Entity::find_by_id(course_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    }

    let groups = group::Entity::find()
        .filter(group::Column::CourseId.eq(course_id))
        .order_by_desc(group::Column::AcademicYear)
        .order_by_asc(group::Column::Name)
        .all(db)
        .await;

    match groups {
        Ok(groups) => (
            StatusCode::OK,
            Json(ApiResponse::success(groups, "Groups retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list course groups", e),
    }
}

/// GET /api/courses/{course_id}/stats
///
/// Counts of groups, sessions and actively enrolled students, plus the
/// attendance tally over all of the course's sessions.
pub async fn course_stats(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match course::Entity::find_by_id(course_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    }

    let stats = async {
        let group_ids: Vec<i64> = group::Entity::find()
            .select_only()
            .column(group::Column::Id)
            .filter(group::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(db)
            .await?;

        let sessions = session::Entity::find()
            .filter(session::Column::CourseId.eq(course_id))
            .count(db)
            .await?;

        let enrolled_students = enrollment::Entity::find()
            .filter(enrollment::Column::GroupId.is_in(group_ids.clone()))
            .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .count(db)
            .await?;

        let session_ids = session::Entity::find()
            .select_only()
            .column(session::Column::Id)
            .filter(session::Column::CourseId.eq(course_id));
        let attendance = attendance_record::Model::tally(
            db,
            Condition::all().add(
                attendance_record::Column::SessionId.in_subquery(session_ids.into_query()),
            ),
        )
        .await?;

        Ok::<_, sea_orm::DbErr>(CourseStats {
            course_id,
            groups: group_ids.len() as u64,
            sessions,
            enrolled_students,
            attendance,
        })
    }
    .await;

    match stats {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Course statistics retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute course stats", e),
    }
}

/// GET /api/courses/{course_id}/sessions
///
/// Sessions of every group of the course, newest first.
///
/// ### Query Parameters
/// - `from`, `to` (optional): Inclusive date range, `YYYY-MM-DD`
pub async fn list_course_sessions(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let (from, to) = match range.parse() {
        Ok(bounds) => bounds,
        Err(resp) => return resp,
    };
    let db = app_state.db();
    match course::Entity::find_by_id(course_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    }

    let mut query = session::Entity::find().filter(session::Column::CourseId.eq(course_id));
    if let Some(from) = from {
        query = query.filter(session::Column::ScheduledDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(session::Column::ScheduledDate.lte(to));
    }

    let sessions = match query
        .order_by_desc(session::Column::ScheduledDate)
        .order_by_asc(session::Column::StartTime)
        .all(db)
        .await
    {
        Ok(sessions) => sessions,
        Err(e) => return db_error("Failed to list course sessions", e),
    };

    match with_names(db, sessions).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to label course sessions", e),
    }
}

/// GET /api/courses/{course_id}/students
///
/// Students actively enrolled in any group of the course, by full name. A
/// student enrolled in two groups appears once per group.
pub async fn list_course_students(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match course::Entity::find_by_id(course_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Course"),
        Err(e) => return db_error("Failed to load course", e),
    }

    match course_students(db, course_id).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Students retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list course students", e),
    }
}

async fn course_students(
    db: &DatabaseConnection,
    course_id: i64,
) -> Result<Vec<CourseStudent>, DbErr> {
    let groups: HashMap<i64, String> = group::Entity::find()
        .filter(group::Column::CourseId.eq(course_id))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    let enrollments = enrollment::Entity::find()
        .filter(enrollment::Column::GroupId.is_in(groups.keys().copied()))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
        .all(db)
        .await?;

    let students: HashMap<i64, student::Model> = student::Entity::find()
        .filter(student::Column::Id.is_in(enrollments.iter().map(|e| e.student_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let users: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(students.values().map(|s| s.user_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut items: Vec<CourseStudent> = enrollments
        .into_iter()
        .filter_map(|e| {
            let student = students.get(&e.student_id)?.clone();
            let account = users.get(&student.user_id);
            Some(CourseStudent {
                username: account.map(|u| u.username.clone()),
                email: account.map(|u| u.email.clone()),
                full_name: account.map(|u| u.full_name.clone()),
                group_name: groups.get(&e.group_id).cloned().unwrap_or_default(),
                group_id: e.group_id,
                enrollment_status: e.status,
                student,
            })
        })
        .collect();
    items.sort_by(|a, b| a.full_name.cmp(&b.full_name));
    Ok(items)
}
