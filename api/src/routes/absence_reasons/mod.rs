//! # Absence Reasons Routes Module
//!
//! Routes for `/api/absence-reasons`, the catalogue used to justify absences.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_absence_reason;
use get::{get_absence_reason, get_absence_reason_by_code, list_absence_reasons};
use post::create_absence_reason;
use put::update_absence_reason;

/// Builds the `/absence-reasons` route group.
///
/// - `GET /absence-reasons` → `list_absence_reasons`
/// - `POST /absence-reasons` → `create_absence_reason`
/// - `GET /absence-reasons/code/{code}` → `get_absence_reason_by_code`
/// - `GET /absence-reasons/{reason_id}` → `get_absence_reason`
/// - `PUT /absence-reasons/{reason_id}` → `update_absence_reason`
/// - `DELETE /absence-reasons/{reason_id}` → `delete_absence_reason`
pub fn absence_reasons_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_absence_reasons).post(create_absence_reason))
        .route("/code/{code}", get(get_absence_reason_by_code))
        .route(
            "/{reason_id}",
            get(get_absence_reason)
                .put(update_absence_reason)
                .delete(delete_absence_reason),
        )
}
