//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub refresh_duration_minutes: u64,
    pub login_max_attempts: u32,
    pub login_window_minutes: u64,
    pub session_generation_max_days: i64,
    /// Peer addresses whose `X-Forwarded-For` header is honoured.
    pub trusted_proxies: Vec<String>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn list_or_empty(key: &str) -> Vec<String> {
    env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every variable has a development default so the server and the test suite
    /// start without a `.env` file. Malformed numeric values fall back to the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "attendance-api"),
            log_level: var_or("LOG_LEVEL", "api=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "data/attendance.db"),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            jwt_secret: var_or("JWT_SECRET", DEV_JWT_SECRET),
            jwt_duration_minutes: parsed_or("JWT_DURATION_MINUTES", 1440),
            refresh_duration_minutes: parsed_or("REFRESH_DURATION_MINUTES", 43200),
            login_max_attempts: parsed_or("LOGIN_MAX_ATTEMPTS", 5),
            login_window_minutes: parsed_or("LOGIN_WINDOW_MINUTES", 15),
            session_generation_max_days: parsed_or("SESSION_GENERATION_MAX_DAYS", 366),
            trusted_proxies: list_or_empty("TRUSTED_PROXIES"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// True when the JWT secret is still the built-in development value.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_refresh_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.refresh_duration_minutes = value);
    }

    pub fn set_login_max_attempts(value: u32) {
        AppConfig::set_field(|cfg| cfg.login_max_attempts = value);
    }

    pub fn set_login_window_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.login_window_minutes = value);
    }

    pub fn set_session_generation_max_days(value: i64) {
        AppConfig::set_field(|cfg| cfg.session_generation_max_days = value);
    }

    pub fn set_trusted_proxies(value: Vec<String>) {
        AppConfig::set_field(|cfg| cfg.trusted_proxies = value);
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn refresh_duration_minutes() -> u64 {
    AppConfig::global().refresh_duration_minutes
}

pub fn login_max_attempts() -> u32 {
    AppConfig::global().login_max_attempts
}

pub fn login_window_minutes() -> u64 {
    AppConfig::global().login_window_minutes
}

pub fn session_generation_max_days() -> i64 {
    AppConfig::global().session_generation_max_days
}

/// True when `ip` is listed in `TRUSTED_PROXIES`.
pub fn is_trusted_proxy(ip: &str) -> bool {
    AppConfig::global().trusted_proxies.iter().any(|p| p == ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_and_reset_restores() {
        AppConfig::set_login_max_attempts(2);
        assert_eq!(login_max_attempts(), 2);

        AppConfig::set_session_generation_max_days(30);
        assert_eq!(session_generation_max_days(), 30);

        unsafe {
            env::remove_var("LOGIN_MAX_ATTEMPTS");
            env::remove_var("SESSION_GENERATION_MAX_DAYS");
        }
        AppConfig::reset();
        assert_eq!(login_max_attempts(), 5);
        assert_eq!(session_generation_max_days(), 366);
    }

    #[test]
    #[serial]
    fn malformed_numbers_fall_back_to_defaults() {
        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 3000);
        unsafe {
            env::remove_var("PORT");
        }
    }

    #[test]
    #[serial]
    fn trusted_proxies_are_split_on_commas() {
        unsafe {
            env::set_var("TRUSTED_PROXIES", " 10.0.0.1, ,10.0.0.2");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.trusted_proxies, vec!["10.0.0.1", "10.0.0.2"]);
        unsafe {
            env::remove_var("TRUSTED_PROXIES");
        }
        assert!(AppConfig::from_env().trusted_proxies.is_empty());
    }
}
