//! Database configuration
//!
//! The section is optional: without it the service runs on the in-memory
//! adapters.

use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::error::ValidationError;

/// PostgreSQL pool settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Apply `migrations/` on startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Pool options derived from this section.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
            .idle_timeout(Some(self.idle_timeout()))
    }

    /// Open the pool. Fails fast if the server is unreachable.
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        self.pool_options().connect(&self.url).await
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: false,
        }
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://md:md@localhost/md_collab".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_connections, 10);
        assert!(!config.run_migrations);
        assert_eq!(config.idle_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_and_foreign_urls_fail() {
        assert_eq!(
            DatabaseConfig::default().validate(),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        );
        let config = DatabaseConfig {
            url: "mysql://localhost/test".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));
    }

    #[test]
    fn test_pool_bounds_are_checked() {
        let inverted = DatabaseConfig {
            min_connections: 20,
            max_connections: 5,
            ..valid()
        };
        assert_eq!(inverted.validate(), Err(ValidationError::InvalidPoolSize));

        let huge = DatabaseConfig {
            max_connections: 500,
            ..valid()
        };
        assert_eq!(huge.validate(), Err(ValidationError::PoolSizeTooLarge));
    }
}
