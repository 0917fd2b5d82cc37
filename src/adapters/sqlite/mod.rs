//! SQLite store adapters.

pub mod account_repository;
pub mod booking_repository;
pub mod connection;
pub mod filter_repository;
pub mod notification_repository;

pub use account_repository::SqliteAccountRepository;
pub use booking_repository::SqliteBookingRepository;
pub use connection::{create_pool, create_test_pool, ConnectionError};
pub use filter_repository::SqliteFilterRepository;
pub use notification_repository::SqliteNotificationRepository;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Storage format for naive local datetimes (class start times).
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Storage format for clock times (filter windows).
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open (creating if missing) and migrate the database at `path`.
pub async fn initialize_database(path: &str) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(path).await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Parse an RFC3339 timestamp from a row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an optional RFC3339 timestamp from a row field.
pub fn parse_optional_datetime(s: Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    s.map(|s| chrono::DateTime::parse_from_rfc3339(&s).map(|d| d.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse a naive local datetime from a row field.
pub fn parse_naive_datetime(s: &str) -> DomainResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an optional naive local datetime from a row field.
pub fn parse_optional_naive_datetime(s: Option<String>) -> DomainResult<Option<NaiveDateTime>> {
    s.map(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an optional clock time from a row field.
pub fn parse_optional_time(s: Option<String>) -> DomainResult<Option<NaiveTime>> {
    s.map(|s| NaiveTime::parse_from_str(&s, TIME_FORMAT))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}
