//! PerfectGym client-portal adapter.
//!
//! Implements the booking gateway against the portal's ClientPortal2 API.
//! Each login builds a fresh HTTP client with its own cookie store, so
//! concurrent account sessions never leak cookies into one another; the
//! portal tracks the session entirely through cookies set on login.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Activity, BookedSlot, BookingServiceConfig, Credentials, SearchWindow, Slot, Trainer,
};
use crate::domain::ports::{BookingGateway, BookingSession};

use super::error::PortalError;
use super::retry::RetryPolicy;
use super::wire::{
    parse_iso8601_duration_minutes, parse_portal_datetime, CalendarFiltersRequest,
    CalendarFiltersResponse, ClassActionRequest, DailyClassesRequest, DailyClassesResponse,
    LoginRequest, LoginResponse, MemberInfo, MyCalendarResponse, WeeklyClassesRequest,
    WeeklyClassesResponse,
};

const LOGIN_PATH: &str = "/ClientPortal2/Auth/Login";
const DAILY_CLASSES_PATH: &str = "/ClientPortal2/Classes/ClassCalendar/DailyClasses";
const BOOK_CLASS_PATH: &str = "/ClientPortal2/Classes/ClassCalendar/BookClass";
const CANCEL_BOOKING_PATH: &str = "/ClientPortal2/Classes/ClassCalendar/CancelBooking";
const WEEKLY_CLASSES_PATH: &str = "/ClientPortal2/Classes/ClassCalendar/WeeklyClasses";
const CALENDAR_FILTERS_PATH: &str = "/ClientPortal2/Classes/ClassCalendar/GetCalendarFilters";
const MY_CALENDAR_PATH: &str = "/ClientPortal2/MyCalendar/MyCalendar/GetCalendar";

/// Gateway into the PerfectGym client portal.
///
/// Holds only configuration and the login retry policy; network state
/// lives on the sessions it produces.
pub struct PerfectGymGateway {
    config: BookingServiceConfig,
    retry: RetryPolicy,
}

impl PerfectGymGateway {
    /// Create a gateway from portal configuration.
    ///
    /// `auth_max_retries` counts total login attempts, so the retry
    /// policy gets one fewer; backoff starts at the configured base and
    /// doubles, capped at one minute.
    pub fn new(config: BookingServiceConfig) -> Self {
        let retry = RetryPolicy::new(
            config.auth_max_retries.saturating_sub(1),
            config.auth_backoff_base_secs.saturating_mul(1_000),
            60_000,
        );
        Self { config, retry }
    }

    /// Fresh HTTP client with an isolated cookie store.
    fn build_client(&self) -> Result<Client, PortalError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/plain, */*"),
        );
        let client = Client::builder()
            .user_agent(&self.config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .build()?;
        Ok(client)
    }
}

#[async_trait]
impl BookingGateway for PerfectGymGateway {
    async fn login(&self, credentials: Credentials<'_>) -> DomainResult<Box<dyn BookingSession>> {
        let client = self
            .build_client()
            .map_err(|err| DomainError::AuthenticationFailed(err.to_string()))?;
        let base_url = self.config.base_url.trim_end_matches('/').to_string();
        let url = format!("{base_url}{LOGIN_PATH}");
        let request = LoginRequest {
            remember_me: true,
            login: credentials.login,
            password: credentials.password,
        };

        let member = self
            .retry
            .execute(|| attempt_login(&client, &url, &request))
            .await
            .map_err(|err| {
                error!(login = credentials.login, error = %err, "Portal authentication failed");
                DomainError::AuthenticationFailed(err.to_string())
            })?;

        info!(member_id = member.id, "Authenticated with booking portal");
        Ok(Box::new(PerfectGymSession {
            http: client,
            base_url,
            member_id: member.id,
            home_club_id: member.home_club_id,
        }))
    }
}

/// One login attempt. The session cookie lands in the client's store on
/// success; the parsed member identity is all the caller needs back.
async fn attempt_login(
    client: &Client,
    url: &str,
    request: &LoginRequest<'_>,
) -> Result<MemberInfo, PortalError> {
    debug!(%url, login = request.login, "POST login");
    let response = client.post(url).json(request).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PortalError::from_status(status, truncate_body(body)));
    }
    let parsed: LoginResponse = response.json().await?;
    parsed
        .user
        .and_then(|user| user.member)
        .ok_or_else(|| PortalError::Unexpected("login response carried no member".to_string()))
}

/// An authenticated portal session, valid for the cookie's lifetime.
///
/// Produced only by [`PerfectGymGateway::login`]; every data operation
/// rides the session cookie held by the owned HTTP client.
#[derive(Debug)]
pub struct PerfectGymSession {
    http: Client,
    base_url: String,
    member_id: i64,
    home_club_id: Option<i64>,
}

impl PerfectGymSession {
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, PortalError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        deserialize_response(response).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        deserialize_response(response).await
    }

    /// Book/cancel share a body shape and differ only in path and in
    /// which status codes count as success.
    async fn class_action(
        &self,
        path: &str,
        class_id: i64,
        accepted: &[u16],
    ) -> Result<(), PortalError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, class_id, "POST");
        let response = self
            .http
            .post(&url)
            .json(&ClassActionRequest { class_id })
            .send()
            .await?;
        let status = response.status();
        if accepted.contains(&status.as_u16()) {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(PortalError::from_status(status, truncate_body(body)))
    }
}

#[async_trait]
impl BookingSession for PerfectGymSession {
    fn member_id(&self) -> i64 {
        self.member_id
    }

    fn home_club_id(&self) -> Option<i64> {
        self.home_club_id
    }

    async fn available_slots(
        &self,
        club_id: i64,
        club_name: &str,
        activity_id: &str,
        window: SearchWindow,
    ) -> DomainResult<Vec<Slot>> {
        let now = Local::now().naive_local();
        let mut slots = Vec::new();

        for date in window.dates(now) {
            let request = DailyClassesRequest {
                club_id,
                date: date.format("%Y-%m-%d").to_string(),
                category_id: None,
                time_table_id: activity_id,
                trainer_id: None,
                zone_id: None,
            };
            let response: DailyClassesResponse =
                match self.post_json(DAILY_CLASSES_PATH, &request).await {
                    Ok(response) => response,
                    Err(err) => {
                        // One bad date must not sink the rest of the window.
                        warn!(%date, club_id, error = %err, "Skipping date after failed class query");
                        continue;
                    }
                };

            for hour in response.calendar_data {
                for class in hour.classes {
                    if class.status.as_deref() != Some("Bookable") {
                        continue;
                    }
                    let Some(start) = parse_portal_datetime(&class.start_time) else {
                        warn!(class_id = class.id, raw = %class.start_time, "Unparseable start time, dropping slot");
                        continue;
                    };
                    let duration_minutes = class
                        .duration
                        .as_deref()
                        .and_then(parse_iso8601_duration_minutes)
                        .unwrap_or(0);
                    let available_spots = class
                        .booking_indicator
                        .as_ref()
                        .and_then(|indicator| indicator.available)
                        .unwrap_or(0);
                    slots.push(Slot {
                        id: class.id,
                        name: class.name,
                        club_id,
                        club_name: club_name.to_string(),
                        activity_id: activity_id.to_string(),
                        trainer: class
                            .trainer
                            .as_ref()
                            .and_then(|trainer| trainer.display_name())
                            .map(str::to_string),
                        start,
                        duration_minutes,
                        available_spots,
                    });
                }
            }
        }

        debug!(count = slots.len(), club_id, activity_id, "Retrieved bookable slots");
        Ok(slots)
    }

    async fn booked_slots(&self) -> DomainResult<Vec<BookedSlot>> {
        let response: MyCalendarResponse = self
            .get_json(MY_CALENDAR_PATH)
            .await
            .map_err(DomainError::from)?;

        let mut booked = Vec::new();
        let buckets = [
            response.recent_items,
            response.future_items,
            response.past_items,
        ];
        for bucket in buckets.into_iter().flatten() {
            for item in bucket.items {
                if item.item_type.as_deref() != Some("GroupClass") {
                    continue;
                }
                let Some(start) = parse_portal_datetime(&item.start_time) else {
                    warn!(class_id = item.id, raw = %item.start_time, "Unparseable calendar entry, dropping");
                    continue;
                };
                booked.push(BookedSlot {
                    id: item.id,
                    name: item.name,
                    start,
                    end: item.end_time.as_deref().and_then(parse_portal_datetime),
                    club: item.club,
                    trainer: item.trainer_display_name,
                    can_cancel: item.can_cancel,
                    is_standby: item.is_stand_by,
                });
            }
        }
        debug!(count = booked.len(), "Retrieved booked classes");
        Ok(booked)
    }

    async fn book(&self, class_id: i64) -> DomainResult<()> {
        self.class_action(BOOK_CLASS_PATH, class_id, &[200])
            .await
            .map_err(|err| DomainError::BookingRejected(err.to_string()))?;
        info!(class_id, "Booked class");
        Ok(())
    }

    async fn cancel(&self, class_id: i64) -> DomainResult<()> {
        self.class_action(CANCEL_BOOKING_PATH, class_id, &[200, 204])
            .await
            .map_err(|err| DomainError::BookingRejected(err.to_string()))?;
        info!(class_id, "Cancelled booking");
        Ok(())
    }

    async fn trainers(&self, club_id: i64, activity_id: &str) -> DomainResult<Vec<Trainer>> {
        let request = WeeklyClassesRequest {
            club_id,
            category_id: None,
            time_table_id: activity_id,
            trainer_id: None,
            zone_id: None,
            days_in_week: 7,
        };
        let response: WeeklyClassesResponse = self
            .post_json(WEEKLY_CLASSES_PATH, &request)
            .await
            .map_err(DomainError::from)?;

        // The weekly grid repeats trainers per cell; a sorted set both
        // deduplicates and orders.
        let mut names = BTreeSet::new();
        for zone in response.calendar_data {
            for hour in zone.classes_per_hour {
                for day in hour.classes_per_day {
                    for cell in day {
                        if let Some(name) = cell.trainer.as_deref() {
                            let trimmed = name.trim();
                            if !trimmed.is_empty() {
                                names.insert(trimmed.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(names.into_iter().map(|name| Trainer { name }).collect())
    }

    async fn activities(&self, club_id: i64) -> DomainResult<Vec<Activity>> {
        let response: CalendarFiltersResponse = self
            .post_json(CALENDAR_FILTERS_PATH, &CalendarFiltersRequest { club_id })
            .await
            .map_err(DomainError::from)?;
        Ok(response
            .time_table_filters
            .into_iter()
            .map(|entry| Activity {
                id: entry.id.as_string(),
                name: entry.name,
            })
            .collect())
    }
}

async fn deserialize_response<T>(response: Response) -> Result<T, PortalError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        response.json::<T>().await.map_err(PortalError::from)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(PortalError::from_status(status, truncate_body(body)))
    }
}

/// Cap error bodies carried into logs and error strings.
fn truncate_body(mut body: String) -> String {
    if let Some((cut, _)) = body.char_indices().nth(500) {
        body.truncate(cut);
    }
    body
}
