//! Configuration management for the Packstation server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Role passwords are deployment configuration, never hardcoded in domain
//! logic.

use packstation_core::Role;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Base URL used in tracking share links.
    pub base_url: String,
    /// Directory holding the JSON document and proof uploads.
    pub data_dir: PathBuf,
    /// Shared-secret password for the front desk role.
    pub front_desk_pass: String,
    /// Shared-secret password for the store role.
    pub store_pass: String,
    /// Shared-secret password for the driver role.
    pub driver_pass: String,
    /// Session time-to-live in hours.
    pub session_ttl_hours: i64,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            front_desk_pass: env::var("FRONT_DESK_PASS").unwrap_or_else(|_| "frontdesk".to_string()),
            store_pass: env::var("STORE_PASS").unwrap_or_else(|_| "store".to_string()),
            driver_pass: env::var("DRIVER_PASS").unwrap_or_else(|_| "driver".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Path of the persisted reservation document.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db.json")
    }

    /// Directory proof uploads are written to.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// The shared secret configured for `role`.
    #[must_use]
    pub fn password_for(&self, role: Role) -> &str {
        match role {
            Role::Frontdesk => &self.front_desk_pass,
            Role::Store => &self.store_pass,
            Role::Driver => &self.driver_pass,
        }
    }
}
