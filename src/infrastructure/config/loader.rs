//! Hierarchical configuration loading.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid portal base URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid search window: {0} hours. Must be between 1 and 336")]
    InvalidSearchWindow(i64),

    #[error("Invalid auth_max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error("Invalid per_run_timeout_secs: {0}. Cannot be 0")]
    InvalidRunTimeout(u64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .classwatch/config.yaml (project config, created by init)
    /// 3. .classwatch/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CLASSWATCH_* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.classwatch/) so one
    /// machine can run separate watch setups from separate directories.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".classwatch/config.yaml"))
            .merge(Yaml::file(".classwatch/local.yaml"))
            .merge(Env::prefixed("CLASSWATCH_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let base_url = &config.booking_service.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
        }

        // Two weeks is already far beyond any realistic booking horizon.
        let window = config.booking_service.search_window_hours;
        if !(1..=336).contains(&window) {
            return Err(ConfigError::InvalidSearchWindow(window));
        }

        if config.booking_service.auth_max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(
                config.booking_service.auth_max_retries,
            ));
        }

        if config.monitor.per_run_timeout_secs == 0 {
            return Err(ConfigError::InvalidRunTimeout(
                config.monitor.per_run_timeout_secs,
            ));
        }

        if config.monitor.default_activity_id.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "default_activity_id cannot be empty".to_string(),
            ));
        }

        if config.telegram.api_base.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "telegram api_base cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
