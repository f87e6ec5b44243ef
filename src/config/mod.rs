//! Application configuration module
//!
//! Configuration is loaded from environment variables (and a `.env` file
//! when present) with the `MD_COLLAB` prefix; nested values use `__`.
//!
//! # Example
//!
//! ```no_run
//! use md_collab::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod review;
mod server;

pub use auth::{AuthConfig, MIN_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use review::ReviewConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::path::PathBuf;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL settings. Absent means in-memory storage.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    pub auth: AuthConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    /// YAML file of users and documents loaded into in-memory storage
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `MD_COLLAB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MD_COLLAB__DATABASE__URL=...` -> `database.url = ...`
    /// - `MD_COLLAB__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MD_COLLAB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation across all sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.review.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    pub fn uses_database(&self) -> bool {
        self.database.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MD_COLLAB__AUTH__JWT_SECRET",
        "MD_COLLAB__DATABASE__URL",
        "MD_COLLAB__SERVER__PORT",
        "MD_COLLAB__SERVER__ENVIRONMENT",
        "MD_COLLAB__REVIEW__LCS_LINE_LIMIT",
        "MD_COLLAB__SEED_FILE",
    ];

    fn set_minimal_env() {
        env::set_var("MD_COLLAB__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.uses_database());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.review.lcs_line_limit, 2000);
        assert!(config.seed_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MD_COLLAB__DATABASE__URL", "postgres://localhost/md");
        env::set_var("MD_COLLAB__SERVER__PORT", "3000");
        env::set_var("MD_COLLAB__REVIEW__LCS_LINE_LIMIT", "500");
        env::set_var("MD_COLLAB__SEED_FILE", "seed/demo.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.review.lcs_line_limit, 500);
        assert_eq!(config.database.unwrap().url, "postgres://localhost/md");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed/demo.yaml")));
    }

    #[test]
    fn test_missing_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_production_requires_long_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MD_COLLAB__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }
}
