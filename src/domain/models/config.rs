//! Main configuration structure for classwatch.

use serde::{Deserialize, Serialize};

/// Top-level configuration, assembled by the figment loader from
/// defaults, YAML files, and `CLASSWATCH_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Booking portal client configuration.
    #[serde(default)]
    pub booking_service: BookingServiceConfig,

    /// Telegram delivery configuration.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Scheduler and fallback configuration.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            booking_service: BookingServiceConfig::default(),
            telegram: TelegramConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    ".classwatch/classwatch.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level when RUST_LOG is not set (trace|debug|info|warn|error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files; stderr only when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// Booking portal client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingServiceConfig {
    /// Portal base URL.
    #[serde(default = "default_portal_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every portal request. The portal
    /// serves its client API to browsers, so a desktop UA is pinned.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Rolling forward horizon polled per sweep, in hours.
    #[serde(default = "default_search_window_hours")]
    pub search_window_hours: i64,

    /// Login attempts before authentication is declared failed.
    #[serde(default = "default_auth_max_retries")]
    pub auth_max_retries: u32,

    /// First retry delay after a transient login failure, in seconds;
    /// doubles on each subsequent attempt.
    #[serde(default = "default_auth_backoff_base_secs")]
    pub auth_backoff_base_secs: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_portal_base_url() -> String {
    "https://zdrofit.perfectgym.pl".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36"
        .to_string()
}

const fn default_search_window_hours() -> i64 {
    48
}

const fn default_auth_max_retries() -> u32 {
    3
}

const fn default_auth_backoff_base_secs() -> u64 {
    2
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BookingServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_base_url(),
            user_agent: default_user_agent(),
            search_window_hours: default_search_window_hours(),
            auth_max_retries: default_auth_max_retries(),
            auth_backoff_base_secs: default_auth_backoff_base_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Telegram delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TelegramConfig {
    /// Bot token. Required for `run`, `check`, and anything else that
    /// delivers messages; commands that never send tolerate it empty.
    #[serde(default)]
    pub bot_token: String,

    /// Bot API base URL.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_telegram_api_base(),
        }
    }
}

/// Scheduler and fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonitorConfig {
    /// Hard ceiling on one sweep across all accounts, in seconds. A
    /// sweep still running when it expires is abandoned; the next
    /// hourly tick starts fresh.
    #[serde(default = "default_per_run_timeout_secs")]
    pub per_run_timeout_secs: u64,

    /// Club polled for accounts that have no filters.
    #[serde(default = "default_club_id")]
    pub default_club_id: i64,

    /// Display name for the no-filter fallback club.
    #[serde(default = "default_club_name")]
    pub default_club_name: String,

    /// Activity/timetable id polled for accounts that have no filters.
    #[serde(default = "default_activity_id")]
    pub default_activity_id: String,
}

const fn default_per_run_timeout_secs() -> u64 {
    300
}

const fn default_club_id() -> i64 {
    7
}

fn default_club_name() -> String {
    "Zdrofit Bemowo Dywizjonu 303".to_string()
}

fn default_activity_id() -> String {
    "20".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            per_run_timeout_secs: default_per_run_timeout_secs(),
            default_club_id: default_club_id(),
            default_club_name: default_club_name(),
            default_activity_id: default_activity_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_portal_constants() {
        let config = Config::default();
        assert_eq!(config.booking_service.search_window_hours, 48);
        assert_eq!(config.booking_service.auth_max_retries, 3);
        assert_eq!(config.booking_service.auth_backoff_base_secs, 2);
        assert_eq!(config.monitor.per_run_timeout_secs, 300);
        assert_eq!(config.monitor.default_club_id, 7);
        assert_eq!(config.monitor.default_activity_id, "20");
    }

    #[test]
    fn test_empty_yaml_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.database.path, ".classwatch/classwatch.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.telegram.bot_token.is_empty());
    }
}
