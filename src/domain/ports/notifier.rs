//! Notification transport port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Filter, Slot};

/// Outbound messages to an account's owner.
///
/// Errors from `notify_slot` matter: the caller must not mark the slot
/// notified when delivery fails, so the next sweep retries. The inline
/// book/dismiss actions attached to a slot notification route back
/// through the UI layer, not through the engine.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the owner a matching slot opened up, with book/dismiss
    /// actions attached.
    async fn notify_slot(&self, account_id: i64, slot: &Slot) -> DomainResult<()>;

    /// Confirm an auto-booking, naming the filter it was credited to.
    async fn confirm_auto_booking(
        &self,
        account_id: i64,
        slot: &Slot,
        filter: &Filter,
    ) -> DomainResult<()>;

    /// Surface a per-account failure, e.g. bad credentials.
    async fn notify_error(&self, account_id: i64, text: &str) -> DomainResult<()>;
}
