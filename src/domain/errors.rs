//! Domain errors for the classwatch engine.

use thiserror::Error;

/// Domain-level errors that can occur while monitoring and booking classes.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Login against the booking portal failed terminally for one account.
    /// The account's cycle is abandoned, the owner is told to check their
    /// credentials, and the next scheduled sweep tries again.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A network-level failure (5xx, timeout, connection reset) that is
    /// worth retrying. Only the login path retries these; every other
    /// portal call fails fast.
    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    /// The portal refused a book or cancel request. Non-fatal: the
    /// candidate falls through to the next matching filter or to a
    /// manual notification.
    #[error("Booking rejected: {0}")]
    BookingRejected(String),

    /// A notification could not be delivered. The candidate's record is
    /// left unmarked so the next sweep retries delivery.
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),

    /// An account already holds the maximum number of filters.
    #[error("Account {account_id} already has {limit} filters")]
    FilterLimitReached { account_id: i64, limit: usize },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Filter not found: {0}")]
    FilterNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
