//! Filter domain model.
//!
//! A filter is a persisted matching rule owned by one account: which club
//! and activity to watch, optionally narrowed by trainer, weekday, and
//! time of day, plus the auto-booking toggle.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Maximum number of filters a single account may hold.
pub const MAX_FILTERS_PER_ACCOUNT: usize = 3;

/// A persisted matching rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    /// Store-assigned id.
    pub id: i64,
    /// Owning account.
    pub account_id: i64,
    /// Club to watch.
    pub club_id: i64,
    /// Club display name (echoed into slots, which the day query does
    /// not label).
    pub club_name: String,
    /// Activity/timetable id, a string on the wire.
    pub activity_id: String,
    /// Activity display name.
    pub activity_name: String,
    /// Optional trainer display name; matched case-insensitively.
    pub trainer: Option<String>,
    /// Optional zone id. Stored for the portal's zone-aware views but
    /// not matched; the day query ignores it.
    pub zone_id: Option<i64>,
    /// Optional zone display name.
    pub zone_name: Option<String>,
    /// Optional inclusive lower bound on the class start time.
    pub time_from: Option<NaiveTime>,
    /// Optional inclusive upper bound on the class start time.
    pub time_to: Option<NaiveTime>,
    /// Optional weekday restriction.
    pub weekdays: Option<WeekdaySet>,
    /// Whether matching slots may be booked without asking.
    pub auto_booking: bool,
    /// When the filter was created. Filters are evaluated in creation
    /// order, which decides which filter an auto-booking is credited to.
    pub created_at: DateTime<Utc>,
}

impl Filter {
    /// Whether a weekday passes this filter's weekday restriction.
    pub fn weekday_allowed(&self, weekday: Weekday) -> bool {
        self.weekdays.as_ref().is_none_or(|set| set.contains(weekday))
    }

    /// Whether a start time falls within this filter's time window.
    /// Both bounds are inclusive; an absent bound does not constrain.
    pub fn time_allowed(&self, start: NaiveTime) -> bool {
        if self.time_from.is_some_and(|from| start < from) {
            return false;
        }
        if self.time_to.is_some_and(|to| start > to) {
            return false;
        }
        true
    }

    /// Short label used in confirmations: "club - activity".
    pub fn label(&self) -> String {
        format!("{} - {}", self.club_name, self.activity_name)
    }
}

/// Input for creating a filter; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewFilter {
    /// Owning account.
    pub account_id: i64,
    /// Club to watch.
    pub club_id: i64,
    /// Club display name.
    pub club_name: String,
    /// Activity/timetable id.
    pub activity_id: String,
    /// Activity display name.
    pub activity_name: String,
    /// Optional trainer display name.
    pub trainer: Option<String>,
    /// Optional zone id.
    pub zone_id: Option<i64>,
    /// Optional zone display name.
    pub zone_name: Option<String>,
    /// Optional inclusive lower bound on the class start time.
    pub time_from: Option<NaiveTime>,
    /// Optional inclusive upper bound on the class start time.
    pub time_to: Option<NaiveTime>,
    /// Optional weekday restriction.
    pub weekdays: Option<WeekdaySet>,
    /// Whether matching slots may be booked without asking.
    pub auto_booking: bool,
}

/// A set of weekdays, persisted as CSV of ISO weekday numbers (Mon=1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Parse from the stored CSV form, e.g. `"1,2,3,4,5"`.
    pub fn from_csv(s: &str) -> DomainResult<Self> {
        let mut bits = 0u8;
        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let n: u8 = token
                .parse()
                .map_err(|_| DomainError::InvalidInput(format!("invalid weekday: {token}")))?;
            if !(1..=7).contains(&n) {
                return Err(DomainError::InvalidInput(format!(
                    "weekday out of range (1-7): {n}"
                )));
            }
            bits |= 1 << (n - 1);
        }
        if bits == 0 {
            return Err(DomainError::InvalidInput(
                "weekday set must name at least one day".to_string(),
            ));
        }
        Ok(Self(bits))
    }

    /// Render back to the stored CSV form, ascending.
    pub fn to_csv(self) -> String {
        (1..=7u8)
            .filter(|n| self.0 & (1 << (n - 1)) != 0)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Membership test.
    pub fn contains(self, weekday: Weekday) -> bool {
        let n = weekday.number_from_monday() as u8;
        self.0 & (1 << (n - 1)) != 0
    }

    /// Number of days in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty. Construction rejects empty sets, so
    /// this only returns true for a zeroed default.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_csv())
    }
}
