//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by resource, each protected by the appropriate guard.
//!
//! Route groups include:
//! - `/health` → Health check (public)
//! - `/auth` → Login, refresh, logout and the current user
//! - `/users`, `/audit` → Administration (admin only)
//! - `/courses`, `/teachers`, `/students`, `/groups`, `/enrollments` → Academic structure
//! - `/timetables`, `/sessions`, `/attendance`, `/absence-reasons` → Scheduling and attendance
//! - `/dashboard` → Aggregated figures

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    absence_reasons::absence_reasons_routes, attendance::attendance_routes, audit::audit_routes,
    auth::auth_routes, courses::courses_routes, dashboard::dashboard_routes,
    enrollments::enrollments_routes, groups::groups_routes, health::health_routes,
    sessions::sessions_routes, students::students_routes, teachers::teachers_routes,
    timetables::timetables_routes, users::users_routes,
};
use axum::{Router, middleware::from_fn_with_state};
use util::state::AppState;

pub mod absence_reasons;
pub mod attendance;
pub mod audit;
pub mod auth;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod groups;
pub mod health;
pub mod sessions;
pub mod students;
pub mod teachers;
pub mod timetables;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// # Route Structure:
/// - `/health`, `/auth/login`, `/auth/refresh` → no authentication required.
/// - `/users`, `/audit` → `allow_admin`.
/// - every other group → `allow_authenticated`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest(
            "/users",
            users_routes().route_layer(from_fn_with_state(app_state.clone(), allow_admin)),
        )
        .nest(
            "/audit",
            audit_routes().route_layer(from_fn_with_state(app_state.clone(), allow_admin)),
        )
        .nest(
            "/courses",
            courses_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/teachers",
            teachers_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/students",
            students_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/groups",
            groups_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/enrollments",
            enrollments_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/timetables",
            timetables_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/sessions",
            sessions_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/attendance",
            attendance_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/absence-reasons",
            absence_reasons_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .nest(
            "/dashboard",
            dashboard_routes()
                .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .with_state(app_state)
}
