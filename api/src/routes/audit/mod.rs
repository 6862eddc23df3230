//! # Audit Routes Module
//!
//! Read-only access to the audit trail. Mounted behind `allow_admin`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::{get_audit_entry, list_audit_entries, list_resource_history};

/// Builds the `/audit` route group.
///
/// - `GET /audit` → `list_audit_entries`
/// - `GET /audit/resource/{resource_type}/{resource_id}` → `list_resource_history`
/// - `GET /audit/{audit_id}` → `get_audit_entry`
pub fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_audit_entries))
        .route(
            "/resource/{resource_type}/{resource_id}",
            get(list_resource_history),
        )
        .route("/{audit_id}", get(get_audit_entry))
}
