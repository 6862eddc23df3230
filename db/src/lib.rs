pub mod models;
pub mod scheduling;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Connects to the database named by `DATABASE_PATH`.
///
/// A bare path is treated as a SQLite file and its parent directory is created.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    Database::connect(&database_url(&config::database_path())).await
}

fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:") {
        return path_or_url.to_owned();
    }
    if let Some(parent) = Path::new(path_or_url).parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(path = %parent.display(), error = %e, "Could not create database directory");
        }
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}

#[cfg(test)]
mod tests {
    use super::database_url;

    #[test]
    fn dsn_is_passed_through() {
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn unusable_parent_still_yields_a_url() {
        let blocker = std::env::temp_dir().join(format!("attendance-db-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("nested").join("app.db");
        let path = path.to_string_lossy().into_owned();

        assert_eq!(database_url(&path), format!("sqlite://{path}?mode=rwc"));
        std::fs::remove_file(&blocker).unwrap();
    }
}
