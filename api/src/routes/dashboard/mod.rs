//! # Dashboard Routes Module
//!
//! Aggregated figures for the home screen.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod get;

use get::{
    get_month, get_overview, get_summary, get_week, list_active_groups, list_most_absent,
    list_upcoming,
};

/// Builds the `/dashboard` route group.
///
/// - `GET /dashboard` → `get_overview`
/// - `GET /dashboard/summary` → `get_summary`
/// - `GET /dashboard/upcoming` → `list_upcoming`
/// - `GET /dashboard/week` → `get_week`
/// - `GET /dashboard/month` → `get_month`
/// - `GET /dashboard/active-groups` → `list_active_groups`
/// - `GET /dashboard/most-absent` → `list_most_absent`
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_overview))
        .route("/summary", get(get_summary))
        .route("/upcoming", get(list_upcoming))
        .route("/week", get(get_week))
        .route("/month", get(get_month))
        .route("/active-groups", get(list_active_groups))
        .route("/most-absent", get(list_most_absent))
}
