use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::enrollment::{self, EnrollmentStatus};
use db::models::{course, group, session, teacher, timetable_entry, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use std::collections::HashMap;
use util::state::AppState;

use super::common::{TeacherFilters, TeacherStats, TeacherTimetableItem, with_users};
use crate::response::ApiResponse;
use crate::routes::common::{
    DateRangeQuery, ListParams, Page, apply_sort, db_error, fetch_page, not_found,
};
use crate::routes::sessions::common::with_names;
use crate::routes::timetables::common::TimetableItem;

async fn teacher_exists(db: &DatabaseConnection, teacher_id: i64) -> Result<bool, DbErr> {
    Ok(teacher::Entity::find_by_id(teacher_id).one(db).await?.is_some())
}

/// Ids of the groups assigned to `teacher_id`, as a subquery.
fn taught_groups(teacher_id: i64) -> sea_orm::sea_query::SelectStatement {
    group::Entity::find()
        .select_only()
        .column(group::Column::Id)
        .filter(group::Column::TeacherId.eq(teacher_id))
        .into_query()
}

/// GET /api/teachers
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`teacher_code`, `department`, `created_at`)
/// - `q` (optional): Partial match on code, specialty or the teacher's full name
/// - `department` (optional): Exact department
pub async fn list_teachers(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
    Query(filters): Query<TeacherFilters>,
) -> Response {
    let db = app_state.db();
    let mut condition = Condition::all();

    if let Some(q) = params.search() {
        let named = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::FullName.contains(&q))
            .into_query();
        condition = condition.add(
            Condition::any()
                .add(teacher::Column::TeacherCode.contains(&q))
                .add(teacher::Column::Specialty.contains(&q))
                .add(teacher::Column::UserId.in_subquery(named)),
        );
    }
    if let Some(department) = filters.department {
        condition = condition.add(teacher::Column::Department.eq(department));
    }

    let query = apply_sort(
        teacher::Entity::find().filter(condition),
        params.sort.as_deref(),
        &["teacher_code", "department", "created_at"],
        teacher::Column::TeacherCode,
    );

    let page = match fetch_page(db, query, &params).await {
        Ok(page) => page,
        Err(e) => return db_error("Failed to list teachers", e),
    };
    let Page {
        items,
        page,
        per_page,
        total,
    } = page;

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
                "Teachers retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => db_error("Failed to load teacher users", e),
    }
}

/// GET /api/teachers/{teacher_id}
pub async fn get_teacher(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let found = match teacher::Entity::find_by_id(teacher_id).one(db).await {
        Ok(Some(t)) => t,
        Ok(None) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    };

    match with_users(db, vec![found]).await {
        Ok(mut list) => match list.pop() {
            Some(item) => (
                StatusCode::OK,
                Json(ApiResponse::success(item, "Teacher retrieved successfully")),
            )
                .into_response(),
            None => not_found("Teacher"),
        },
        Err(e) => db_error("Failed to load teacher user", e),
    }
}

/// GET /api/teachers/code/{code}
pub async fn get_teacher_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    let db = app_state.db();
    let found = match teacher::Model::find_by_code(db, &code).await {
        Ok(Some(t)) => t,
        Ok(None) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    };

    match with_users(db, vec![found]).await {
        Ok(mut list) => match list.pop() {
            Some(item) => (
                StatusCode::OK,
                Json(ApiResponse::success(item, "Teacher retrieved successfully")),
            )
                .into_response(),
            None => not_found("Teacher"),
        },
        Err(e) => db_error("Failed to load teacher user", e),
    }
}

/// GET /api/teachers/{teacher_id}/groups
///
/// Groups currently assigned to the teacher.
pub async fn list_teacher_groups(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match teacher::Entity::find_by_id(teacher_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    let groups = group::Entity::find()
        .filter(group::Column::TeacherId.eq(teacher_id))
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
        Err(e) => db_error("Failed to list teacher groups", e),
    }
}

/// GET /api/teachers/{teacher_id}/timetable
///
/// Weekly slots of every group the teacher is assigned to, ordered by weekday,
/// then start time.
pub async fn list_teacher_timetable(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match teacher_exists(db, teacher_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    match teacher_timetable(db, teacher_id).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Timetable retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to list teacher timetable", e),
    }
}

async fn teacher_timetable(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<Vec<TeacherTimetableItem>, DbErr> {
    let groups: HashMap<i64, group::Model> = group::Entity::find()
        .filter(group::Column::TeacherId.eq(teacher_id))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let course_ids: Vec<i64> = groups.values().map(|g| g.course_id).collect();
    let courses: HashMap<i64, String> = course::Entity::find()
        .filter(course::Column::Id.is_in(course_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let entries = timetable_entry::Entity::find()
        .filter(timetable_entry::Column::GroupId.is_in(groups.keys().copied()))
        .order_by_asc(timetable_entry::Column::Weekday)
        .order_by_asc(timetable_entry::Column::StartTime)
        .all(db)
        .await?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let group = groups.get(&entry.group_id)?;
            Some(TeacherTimetableItem {
                group_name: group.name.clone(),
                course_name: courses.get(&group.course_id).cloned(),
                item: TimetableItem::from(entry),
            })
        })
        .collect())
}

/// GET /api/teachers/{teacher_id}/sessions
///
/// Sessions of the teacher's groups, newest first.
///
/// ### Query Parameters
/// - `from`, `to` (optional): Inclusive date range, `YYYY-MM-DD`
pub async fn list_teacher_sessions(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<i64>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    let (from, to) = match range.parse() {
        Ok(bounds) => bounds,
        Err(resp) => return resp,
    };
    let db = app_state.db();
    match teacher_exists(db, teacher_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    let mut query =
        session::Entity::find().filter(session::Column::GroupId.in_subquery(taught_groups(teacher_id)));
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
        Err(e) => return db_error("Failed to list teacher sessions", e),
    };

    match with_names(db, sessions).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(items, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to label teacher sessions", e),
    }
}

/// GET /api/teachers/{teacher_id}/stats
///
/// Group count, active enrollments across those groups and their session count.
pub async fn get_teacher_stats(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    match teacher_exists(db, teacher_id).await {
        Ok(true) => {}
        Ok(false) => return not_found("Teacher"),
        Err(e) => return db_error("Failed to load teacher", e),
    }

    match teacher_stats(db, teacher_id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Teacher statistics retrieved successfully")),
        )
            .into_response(),
        Err(e) => db_error("Failed to compute teacher statistics", e),
    }
}

async fn teacher_stats(db: &DatabaseConnection, teacher_id: i64) -> Result<TeacherStats, DbErr> {
    let groups = group::Entity::find()
        .filter(group::Column::TeacherId.eq(teacher_id))
        .count(db)
        .await?;
    let active_students = enrollment::Entity::find()
        .filter(enrollment::Column::GroupId.in_subquery(taught_groups(teacher_id)))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
        .count(db)
        .await?;
    let sessions = session::Entity::find()
        .filter(session::Column::GroupId.in_subquery(taught_groups(teacher_id)))
        .count(db)
        .await?;

    Ok(TeacherStats {
        teacher_id,
        groups,
        active_students,
        sessions,
    })
}
