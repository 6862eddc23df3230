//! # Users Routes Module
//!
//! Routes for the `/api/users` endpoint group. The whole group is mounted
//! behind `allow_admin`.

use axum::{
    Router,
    routing::{get, patch},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod patch;
pub mod post;
pub mod put;

use delete::delete_user;
use get::{get_user, list_users};
use patch::{change_user_password, change_user_status};
use post::create_user;
use put::update_user;

/// Builds the `/users` route group.
///
/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET /users/{user_id}` → `get_user`
/// - `PUT /users/{user_id}` → `update_user`
/// - `DELETE /users/{user_id}` → `delete_user`
/// - `PATCH /users/{user_id}/status` → `change_user_status`
/// - `PATCH /users/{user_id}/password` → `change_user_password`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{user_id}/status", patch(change_user_status))
        .route("/{user_id}/password", patch(change_user_password))
}
