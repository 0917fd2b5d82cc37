//! Request and response shapes for the PerfectGym client portal.
//!
//! Requests use camelCase keys except login, which the portal expects in
//! PascalCase. Responses are PascalCase throughout. All response structs
//! default missing collections to empty so partial payloads parse.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Login request body. The portal wants PascalCase here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest<'a> {
    /// Always true; keeps the session cookie long-lived.
    pub remember_me: bool,
    /// Account email.
    pub login: &'a str,
    /// Account password, sent in the clear over TLS.
    pub password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    /// Authenticated user envelope.
    pub user: Option<LoginUser>,
}

/// The `User` object of a login response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginUser {
    /// Membership details.
    pub member: Option<MemberInfo>,
}

/// Member identity returned on login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberInfo {
    /// Portal member id.
    pub id: i64,
    /// The member's home club, when one is set.
    pub home_club_id: Option<i64>,
}

/// Day-granular class listing request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClassesRequest<'a> {
    /// Club to query.
    pub club_id: i64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Unused; the portal expects the key with a null value.
    pub category_id: Option<i64>,
    /// Activity/timetable id, a string on the wire.
    pub time_table_id: &'a str,
    /// Unused; sent as null.
    pub trainer_id: Option<i64>,
    /// Unused; sent as null.
    pub zone_id: Option<i64>,
}

/// Day-granular class listing response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyClassesResponse {
    /// Hour buckets, each holding the classes starting in that hour.
    #[serde(default)]
    pub calendar_data: Vec<CalendarHour>,
}

/// One hour bucket of a daily class listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarHour {
    /// Classes starting within this bucket.
    #[serde(default)]
    pub classes: Vec<PortalClass>,
}

/// A single class occurrence in a daily listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortalClass {
    /// Service-assigned class occurrence id.
    pub id: i64,
    /// Class display name.
    pub name: String,
    /// Local start time, ISO-8601 without offset.
    pub start_time: String,
    /// ISO-8601 duration, e.g. `PT55M` or `PT1H30M`.
    pub duration: Option<String>,
    /// Booking status; only `"Bookable"` slots are usable.
    pub status: Option<String>,
    /// Trainer, either an object or a bare name string.
    pub trainer: Option<TrainerRef>,
    /// Capacity details.
    pub booking_indicator: Option<BookingIndicator>,
}

/// The portal emits the trainer as `{"Name": …}` on some endpoints and
/// as a bare string on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrainerRef {
    /// Object form.
    Detailed {
        /// Trainer display name.
        #[serde(rename = "Name")]
        name: Option<String>,
    },
    /// Bare string form.
    Name(String),
}

impl TrainerRef {
    /// The display name, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        let name = match self {
            TrainerRef::Detailed { name } => name.as_deref()?,
            TrainerRef::Name(name) => name.as_str(),
        };
        let trimmed = name.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }
}

/// Remaining-capacity details of a class occurrence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookingIndicator {
    /// Free spots left.
    pub available: Option<i64>,
}

/// Book/cancel request body; both endpoints take the same shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassActionRequest {
    /// Class occurrence id to act on.
    pub class_id: i64,
}

/// Personal calendar response, three buckets of past/current/future items.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MyCalendarResponse {
    /// Items around "now".
    pub recent_items: Option<CalendarBucket>,
    /// Upcoming items.
    pub future_items: Option<CalendarBucket>,
    /// Historical items.
    pub past_items: Option<CalendarBucket>,
}

/// One bucket of the personal calendar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarBucket {
    /// Entries in this bucket.
    #[serde(default)]
    pub items: Vec<CalendarItem>,
}

/// One entry of the personal calendar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarItem {
    /// Class occurrence id.
    pub id: i64,
    /// Entry kind; group classes carry `"GroupClass"`.
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    /// Class display name.
    pub name: String,
    /// Local start time.
    pub start_time: String,
    /// Local end time, when reported.
    pub end_time: Option<String>,
    /// Club display name.
    pub club: Option<String>,
    /// Trainer display name.
    pub trainer_display_name: Option<String>,
    /// Whether the portal still allows cancelling this entry.
    #[serde(default)]
    pub can_cancel: bool,
    /// Whether the account is wait-listed rather than booked.
    #[serde(default)]
    pub is_stand_by: bool,
}

/// Weekly schedule request, used to derive the trainer catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyClassesRequest<'a> {
    /// Club to query.
    pub club_id: i64,
    /// Unused; sent as null.
    pub category_id: Option<i64>,
    /// Activity/timetable id.
    pub time_table_id: &'a str,
    /// Unused; sent as null.
    pub trainer_id: Option<i64>,
    /// Unused; sent as null.
    pub zone_id: Option<i64>,
    /// Always 7, one full week.
    pub days_in_week: u8,
}

/// Weekly schedule response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyClassesResponse {
    /// Zone groups of the weekly grid.
    #[serde(default)]
    pub calendar_data: Vec<WeeklyZone>,
}

/// One zone group of the weekly grid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyZone {
    /// Hour rows of the grid.
    #[serde(default)]
    pub classes_per_hour: Vec<WeeklyHour>,
}

/// One hour row of the weekly grid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyHour {
    /// Seven day columns, each a list of classes at that hour.
    #[serde(default)]
    pub classes_per_day: Vec<Vec<WeeklyCell>>,
}

/// One class cell of the weekly grid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyCell {
    /// Trainer display name; a bare string on this endpoint.
    pub trainer: Option<String>,
}

/// Calendar-filters request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFiltersRequest {
    /// Club whose catalog to fetch.
    pub club_id: i64,
}

/// Calendar-filters response; only the timetable catalog is consumed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarFiltersResponse {
    /// Activity/timetable catalog entries.
    #[serde(default)]
    pub time_table_filters: Vec<CatalogEntry>,
}

/// One catalog entry of the calendar filters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEntry {
    /// Entry id; the portal mixes numeric and string forms.
    pub id: IdValue,
    /// Entry display name.
    pub name: String,
}

/// An id that arrives as either a JSON number or a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    /// Numeric form.
    Num(i64),
    /// String form.
    Str(String),
}

impl IdValue {
    /// Canonical string form of the id.
    pub fn as_string(&self) -> String {
        match self {
            IdValue::Num(n) => n.to_string(),
            IdValue::Str(s) => s.clone(),
        }
    }
}

/// Parse an ISO-8601 duration like `PT55M` or `PT1H30M` into minutes.
///
/// Only the hour and minute designators are honored; a seconds component
/// is discarded. Returns `None` for malformed input.
pub fn parse_iso8601_duration_minutes(raw: &str) -> Option<i64> {
    let rest = raw.trim().strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut minutes: i64 = 0;
    let mut digits = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value: i64 = digits.parse().ok()?;
        digits.clear();
        match ch {
            'H' => minutes = minutes.checked_add(value.checked_mul(60)?)?,
            'M' => minutes = minutes.checked_add(value)?,
            'S' => {}
            _ => return None,
        }
    }
    if !digits.is_empty() {
        // Trailing digits without a designator.
        return None;
    }
    Some(minutes)
}

/// Parse a portal timestamp into a naive local datetime.
///
/// The portal emits local times like `2026-03-03T06:15:00`, occasionally
/// with fractional seconds or a trailing `Z`; everything past the seconds
/// field is ignored.
pub fn parse_portal_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.len() < 19 {
        return None;
    }
    NaiveDateTime::parse_from_str(&trimmed[..19], "%Y-%m-%dT%H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_minutes_only() {
        assert_eq!(parse_iso8601_duration_minutes("PT55M"), Some(55));
    }

    #[test]
    fn test_duration_hours_and_minutes() {
        assert_eq!(parse_iso8601_duration_minutes("PT1H30M"), Some(90));
        assert_eq!(parse_iso8601_duration_minutes("PT2H"), Some(120));
    }

    #[test]
    fn test_duration_ignores_seconds() {
        assert_eq!(parse_iso8601_duration_minutes("PT45M30S"), Some(45));
    }

    #[test]
    fn test_duration_rejects_garbage() {
        assert_eq!(parse_iso8601_duration_minutes(""), None);
        assert_eq!(parse_iso8601_duration_minutes("PT"), None);
        assert_eq!(parse_iso8601_duration_minutes("55M"), None);
        assert_eq!(parse_iso8601_duration_minutes("PT5X"), None);
        assert_eq!(parse_iso8601_duration_minutes("PT5"), None);
    }

    #[test]
    fn test_portal_datetime_plain() {
        let parsed = parse_portal_datetime("2026-03-03T06:15:00").unwrap();
        assert_eq!(parsed.to_string(), "2026-03-03 06:15:00");
    }

    #[test]
    fn test_portal_datetime_with_fraction_and_zone() {
        assert!(parse_portal_datetime("2026-03-03T06:15:00.0000000").is_some());
        assert!(parse_portal_datetime("2026-03-03T06:15:00Z").is_some());
        assert!(parse_portal_datetime("2026-03-03").is_none());
    }

    #[test]
    fn test_trainer_ref_both_forms() {
        let detailed: TrainerRef = serde_json::from_str(r#"{"Name": "ADAM NOWAK"}"#).unwrap();
        assert_eq!(detailed.display_name(), Some("ADAM NOWAK"));

        let bare: TrainerRef = serde_json::from_str(r#""EWA KOWALSKA""#).unwrap();
        assert_eq!(bare.display_name(), Some("EWA KOWALSKA"));

        let empty: TrainerRef = serde_json::from_str(r#"{"Name": "  "}"#).unwrap();
        assert_eq!(empty.display_name(), None);
    }

    #[test]
    fn test_id_value_both_forms() {
        let entries: Vec<CatalogEntry> = serde_json::from_str(
            r#"[{"Id": 20, "Name": "Fitness"}, {"Id": "63", "Name": "Joga"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].id.as_string(), "20");
        assert_eq!(entries[1].id.as_string(), "63");
    }

    #[test]
    fn test_login_response_shape() {
        let body = r#"{"User": {"Member": {"Id": 1234, "HomeClubId": 7}}, "State": "Classes"}"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        let member = parsed.user.unwrap().member.unwrap();
        assert_eq!(member.id, 1234);
        assert_eq!(member.home_club_id, Some(7));
    }

    #[test]
    fn test_daily_request_serializes_nulls() {
        let request = DailyClassesRequest {
            club_id: 7,
            date: "2026-03-03".to_string(),
            category_id: None,
            time_table_id: "20",
            trainer_id: None,
            zone_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["clubId"], 7);
        assert_eq!(json["timeTableId"], "20");
        assert!(json["categoryId"].is_null());
        assert!(json["zoneId"].is_null());
    }
}
