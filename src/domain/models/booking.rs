//! Booking domain model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::slot::Slot;

/// Active bookings a single filter may hold before further auto-booking
/// attempts for that filter are suppressed.
pub const AUTO_BOOKING_CAP: i64 = 3;

/// A successful reservation against the booking service.
///
/// References the slot by id only; the slot may no longer exist when the
/// booking is later inspected. Cancellation is logical: `cancelled_at`
/// is set and the row stays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned id.
    pub id: i64,
    /// Owning account.
    pub account_id: i64,
    /// Service-assigned class occurrence id. Unique per account among
    /// active bookings.
    pub class_id: i64,
    /// Class display name at booking time.
    pub title: String,
    /// Class start in local time.
    pub start_time: NaiveDateTime,
    /// Filter the booking is credited to; None means booked manually.
    pub filter_id: Option<i64>,
    /// Whether the engine booked this without asking.
    pub is_auto_booked: bool,
    /// When the reservation was recorded.
    pub booked_at: DateTime<Utc>,
    /// Set when the booking is cancelled; the row is never hard-deleted.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether the booking still counts against caps and uniqueness.
    pub fn is_active(&self) -> bool {
        self.cancelled_at.is_none()
    }
}

/// Input for recording a booking; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Owning account.
    pub account_id: i64,
    /// Service-assigned class occurrence id.
    pub class_id: i64,
    /// Class display name.
    pub title: String,
    /// Class start in local time.
    pub start_time: NaiveDateTime,
    /// Filter the booking is credited to, if any.
    pub filter_id: Option<i64>,
    /// Whether the engine booked this without asking.
    pub is_auto_booked: bool,
}

impl NewBooking {
    /// Booking record for a slot the engine just auto-booked.
    pub fn auto_booked(account_id: i64, slot: &Slot, filter_id: i64) -> Self {
        Self {
            account_id,
            class_id: slot.id,
            title: slot.name.clone(),
            start_time: slot.start,
            filter_id: Some(filter_id),
            is_auto_booked: true,
        }
    }
}
