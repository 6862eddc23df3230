//! # auth Routes Module
//!
//! Defines and wires up routes for the `/api/auth` endpoint group.
//!
//! ## Structure
//! - `post.rs`: POST handlers (login, refresh, logout)
//! - `get.rs`: GET handlers (current user)
//! - `common.rs`: token issuing and response types
//!
//! `login` and `refresh` are public; `logout` and `me` sit behind `allow_authenticated`.

pub mod common;
pub mod get;
pub mod post;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use get::get_me;
use post::{login, logout, refresh};

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login`
/// - `POST /auth/refresh` → `refresh`
/// - `POST /auth/logout` → `logout` (authenticated)
/// - `GET /auth/me` → `get_me` (authenticated)
pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route(
            "/logout",
            post(logout).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .route(
            "/me",
            get(get_me).route_layer(from_fn_with_state(app_state, allow_authenticated)),
        )
}
