//! Slot domain model: ephemeral class occurrences fetched per poll.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One bookable class occurrence, as returned by a day-granular poll.
///
/// Slots are never persisted; they live only inside one sweep's working
/// set. The id is service-assigned and stable across polls of the same
/// underlying occurrence, which is what deduplication and the
/// already-booked check key on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Service-assigned class occurrence id.
    pub id: i64,
    /// Class display name, e.g. "Zdrowy Kręgosłup".
    pub name: String,
    /// Club the slot was queried for.
    pub club_id: i64,
    /// Club display name, supplied by the caller; the day query does
    /// not echo it.
    pub club_name: String,
    /// Activity/timetable id the slot was queried for.
    pub activity_id: String,
    /// Trainer display name, when the portal lists one.
    pub trainer: Option<String>,
    /// Start of the class in the club's local time.
    pub start: NaiveDateTime,
    /// Class length in minutes.
    pub duration_minutes: i64,
    /// Remaining free spots.
    pub available_spots: i64,
}

impl Slot {
    /// Local weekday of the start time.
    pub fn weekday(&self) -> Weekday {
        self.start.weekday()
    }

    /// Local clock time of the start.
    pub fn start_time(&self) -> NaiveTime {
        self.start.time()
    }

    /// End of the class, start plus duration.
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

/// A class the account already holds on the portal's personal calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    /// Service-assigned class occurrence id.
    pub id: i64,
    /// Class display name.
    pub name: String,
    /// Start of the class in local time.
    pub start: NaiveDateTime,
    /// End of the class, when the portal reports one.
    pub end: Option<NaiveDateTime>,
    /// Club display name.
    pub club: Option<String>,
    /// Trainer display name.
    pub trainer: Option<String>,
    /// Whether the portal still allows cancelling.
    pub can_cancel: bool,
    /// Whether the account is on the stand-by list rather than booked.
    pub is_standby: bool,
}

/// A trainer, identified by display name only; the weekly-schedule
/// endpoint exposes no stable id for this query path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    /// Trainer display name, the deduplication and matching key.
    pub name: String,
}

/// An activity/timetable entry from the portal's calendar-filter catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Timetable id, a string on the wire.
    pub id: String,
    /// Activity display name.
    pub name: String,
}

/// The rolling forward horizon slots are polled within.
///
/// The upstream API is day-granular, so the window is realized as one
/// request per calendar date from today through the window end's date,
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// Horizon length in hours from "now".
    pub hours: i64,
}

impl SearchWindow {
    /// Window of the given number of hours.
    pub fn hours(hours: i64) -> Self {
        Self { hours }
    }

    /// Every calendar date the window touches, starting at `now`'s date.
    pub fn dates(&self, now: NaiveDateTime) -> Vec<NaiveDate> {
        let last = (now + Duration::hours(self.hours)).date();
        let mut dates = Vec::new();
        let mut date = now.date();
        while date <= last {
            dates.push(date);
            date += Duration::days(1);
        }
        dates
    }
}
