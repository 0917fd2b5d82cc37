//! Booking-service gateway port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Activity, BookedSlot, Credentials, SearchWindow, Slot, Trainer};

/// Entry point to the booking service: turns credentials into a live
/// session.
///
/// Every data operation lives on [`BookingSession`], which only
/// `login` can produce; an unauthenticated caller has nothing to call
/// data operations on, so the boundary fails closed by construction.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Authenticate and return a session. Transient failures (5xx,
    /// timeouts) are retried with exponential backoff up to the
    /// configured ceiling; anything else, or exhaustion, is a terminal
    /// `AuthenticationFailed` and no partial session is left usable.
    async fn login(&self, credentials: Credentials<'_>) -> DomainResult<Box<dyn BookingSession>>;
}

/// An authenticated session against the booking service.
///
/// Sessions live for one account's check within one sweep and are
/// dropped afterwards; the engine never stores them.
#[async_trait]
pub trait BookingSession: Send + Sync + std::fmt::Debug {
    /// Member id the portal resolved the credentials to.
    fn member_id(&self) -> i64;

    /// The member's home club, when the portal reports one.
    fn home_club_id(&self) -> Option<i64>;

    /// Bookable slots for one club and activity across the window.
    ///
    /// Queried one request per calendar date; a failed date is logged
    /// and skipped without aborting the rest. Returned slots carry the
    /// given club id/name and activity id.
    async fn available_slots(
        &self,
        club_id: i64,
        club_name: &str,
        activity_id: &str,
        window: SearchWindow,
    ) -> DomainResult<Vec<Slot>>;

    /// The account's group classes from the portal's personal calendar,
    /// merged across its recent/future/past buckets.
    async fn booked_slots(&self) -> DomainResult<Vec<BookedSlot>>;

    /// Book one class. Single attempt, no internal retry; a refusal is
    /// `BookingRejected`.
    async fn book(&self, class_id: i64) -> DomainResult<()>;

    /// Cancel one class. Single attempt, no internal retry.
    async fn cancel(&self, class_id: i64) -> DomainResult<()>;

    /// Trainers teaching an activity at a club, deduplicated by display
    /// name and sorted. Name is the identity; the portal exposes no
    /// stable trainer id on this path.
    async fn trainers(&self, club_id: i64, activity_id: &str) -> DomainResult<Vec<Trainer>>;

    /// The activity/timetable catalog for a club.
    async fn activities(&self, club_id: i64) -> DomainResult<Vec<Activity>>;
}
