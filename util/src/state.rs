//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection and the login throttle. Cloning is cheap: the
//! connection is pooled and the throttle is reference counted.

use crate::throttle::LoginThrottle;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    login_throttle: LoginThrottle,
}

impl AppState {
    /// Creates a new `AppState` around the given database connection with an empty
    /// login throttle.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            login_throttle: LoginThrottle::new(),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn login_throttle(&self) -> &LoginThrottle {
        &self.login_throttle
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
