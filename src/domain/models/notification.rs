//! Notification marker model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per (account, class) record of whether the owner has been told about
/// a slot and whether they dismissed it.
///
/// A row with `notified_at` set means the message went out; a row
/// without it means a delivery attempt failed and the slot stays
/// eligible for the next sweep. `skipped` is set by the dismiss action
/// in the UI layer and suppresses any further presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Account the marker belongs to.
    pub account_id: i64,
    /// Service-assigned class occurrence id.
    pub class_id: i64,
    /// Class display name at notification time.
    pub class_name: Option<String>,
    /// Class start in local time, when known.
    pub start_time: Option<NaiveDateTime>,
    /// When the notification was delivered; None until a send succeeds.
    pub notified_at: Option<DateTime<Utc>>,
    /// Whether the owner dismissed the slot.
    pub skipped: bool,
    /// When the marker row was first written.
    pub created_at: DateTime<Utc>,
}
