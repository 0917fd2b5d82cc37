//! Booking repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Booking, NewBooking};

/// Store operations for recorded bookings.
///
/// Bookings are never hard-deleted; cancellation sets `cancelled_at`
/// and the row drops out of every "active" query. Per-filter booking
/// counters are always recomputed from active rows, never cached.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Record a successful reservation and return its assigned id.
    async fn insert(&self, booking: &NewBooking) -> DomainResult<i64>;

    /// Active bookings credited to one filter.
    async fn count_active_for_filter(&self, account_id: i64, filter_id: i64)
        -> DomainResult<i64>;

    /// Whether the account holds an active booking for this class.
    async fn is_actively_booked(&self, account_id: i64, class_id: i64) -> DomainResult<bool>;

    /// Logically delete the active booking for this class, if any.
    async fn cancel(&self, account_id: i64, class_id: i64) -> DomainResult<()>;

    /// An account's bookings, newest first. Includes cancelled rows.
    async fn list_for_account(&self, account_id: i64) -> DomainResult<Vec<Booking>>;
}
