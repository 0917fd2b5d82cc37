//! Notification marker repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{NotificationRecord, Slot};

/// Store operations for per-(account, class) notification markers.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Fetch the full marker row, if one exists.
    async fn get(&self, account_id: i64, class_id: i64)
        -> DomainResult<Option<NotificationRecord>>;

    /// Whether the account was already told about this class.
    async fn is_notified(&self, account_id: i64, class_id: i64) -> DomainResult<bool>;

    /// Whether the account dismissed this class.
    async fn is_skipped(&self, account_id: i64, class_id: i64) -> DomainResult<bool>;

    /// Record a delivered notification. Called only after the transport
    /// accepted the message; a failed send must leave no mark so the
    /// next sweep retries.
    async fn mark_notified(&self, account_id: i64, slot: &Slot) -> DomainResult<()>;

    /// Record a dismissal. Driven by the UI layer's "not interested"
    /// action; the engine only reads it.
    async fn mark_skipped(&self, account_id: i64, class_id: i64) -> DomainResult<()>;
}
