//! # Timetables Routes Module
//!
//! Routes for `/api/timetables`: the weekly slots of each group. Every write
//! goes through the [`ConflictChecker`](db::scheduling::ConflictChecker) so
//! that a group never has two overlapping active entries on the same weekday.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_timetable_entry;
use get::{get_timetable_entry, list_group_timetable_entries, list_timetable_entries};
use post::{create_timetable_entry, validate_conflict};
use put::update_timetable_entry;

/// Builds the `/timetables` route group.
///
/// - `GET /timetables` → `list_timetable_entries`
/// - `POST /timetables` → `create_timetable_entry`
/// - `POST /timetables/validate-conflict` → `validate_conflict`
/// - `GET /timetables/group/{group_id}` → `list_group_timetable_entries`
/// - `GET /timetables/{entry_id}` → `get_timetable_entry`
/// - `PUT /timetables/{entry_id}` → `update_timetable_entry`
/// - `DELETE /timetables/{entry_id}` → `delete_timetable_entry`
pub fn timetables_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_timetable_entries).post(create_timetable_entry))
        .route("/validate-conflict", post(validate_conflict))
        .route("/group/{group_id}", get(list_group_timetable_entries))
        .route(
            "/{entry_id}",
            get(get_timetable_entry)
                .put(update_timetable_entry)
                .delete(delete_timetable_entry),
        )
}
