//! End-to-end sweep tests: real SQLite stores behind a stubbed portal
//! and a recording notifier.

mod helpers;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use classwatch::adapters::sqlite::{
    SqliteAccountRepository, SqliteBookingRepository, SqliteFilterRepository,
    SqliteNotificationRepository,
};
use classwatch::domain::errors::{DomainError, DomainResult};
use classwatch::domain::models::{
    Account, Activity, BookedSlot, Credentials, Filter, NewBooking, NewFilter, SearchWindow, Slot,
    Trainer,
};
use classwatch::domain::ports::{
    AccountRepository, BookingGateway, BookingRepository, BookingSession, FilterRepository,
    NotificationRepository, Notifier,
};
use classwatch::services::{FallbackTarget, SweepService};
use sqlx::SqlitePool;

use helpers::database::{setup_test_db, teardown_test_db};

const CLUB_ID: i64 = 7;
const CLUB_NAME: &str = "Zdrofit Bemowo Dywizjonu 303";
const ACTIVITY_ID: &str = "20";

/// Programmable portal double. Slots are keyed by (club, activity);
/// book calls and slot queries are recorded through shared handles so
/// tests can inspect them after the sweep.
#[derive(Default)]
struct StubPortal {
    slots: HashMap<(i64, String), Vec<Slot>>,
    rejected_logins: HashSet<String>,
    unreachable_logins: HashSet<String>,
    book_refusals: HashSet<i64>,
    book_attempts: Arc<Mutex<Vec<i64>>>,
    booked: Arc<Mutex<Vec<i64>>>,
    queries: Arc<Mutex<Vec<(i64, String)>>>,
}

impl StubPortal {
    fn with_slots(slots: Vec<Slot>) -> Self {
        let mut portal = Self::default();
        for slot in slots {
            portal
                .slots
                .entry((slot.club_id, slot.activity_id.clone()))
                .or_default()
                .push(slot);
        }
        portal
    }

    fn book_attempts(&self) -> Vec<i64> {
        self.book_attempts.lock().unwrap().clone()
    }

    fn booked(&self) -> Vec<i64> {
        self.booked.lock().unwrap().clone()
    }

    fn queries(&self) -> Vec<(i64, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingGateway for StubPortal {
    async fn login(&self, credentials: Credentials<'_>) -> DomainResult<Box<dyn BookingSession>> {
        if self.rejected_logins.contains(credentials.login) {
            return Err(DomainError::AuthenticationFailed(
                "invalid credentials".to_string(),
            ));
        }
        if self.unreachable_logins.contains(credentials.login) {
            return Err(DomainError::TransientNetwork("portal unreachable".to_string()));
        }
        Ok(Box::new(StubSession {
            slots: self.slots.clone(),
            book_refusals: self.book_refusals.clone(),
            book_attempts: Arc::clone(&self.book_attempts),
            booked: Arc::clone(&self.booked),
            queries: Arc::clone(&self.queries),
        }))
    }
}

#[derive(Debug)]
struct StubSession {
    slots: HashMap<(i64, String), Vec<Slot>>,
    book_refusals: HashSet<i64>,
    book_attempts: Arc<Mutex<Vec<i64>>>,
    booked: Arc<Mutex<Vec<i64>>>,
    queries: Arc<Mutex<Vec<(i64, String)>>>,
}

#[async_trait]
impl BookingSession for StubSession {
    fn member_id(&self) -> i64 {
        1000
    }

    fn home_club_id(&self) -> Option<i64> {
        None
    }

    async fn available_slots(
        &self,
        club_id: i64,
        _club_name: &str,
        activity_id: &str,
        _window: SearchWindow,
    ) -> DomainResult<Vec<Slot>> {
        self.queries
            .lock()
            .unwrap()
            .push((club_id, activity_id.to_string()));
        Ok(self
            .slots
            .get(&(club_id, activity_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn booked_slots(&self) -> DomainResult<Vec<BookedSlot>> {
        Ok(Vec::new())
    }

    async fn book(&self, class_id: i64) -> DomainResult<()> {
        self.book_attempts.lock().unwrap().push(class_id);
        if self.book_refusals.contains(&class_id) {
            return Err(DomainError::BookingRejected("class is full".to_string()));
        }
        self.booked.lock().unwrap().push(class_id);
        Ok(())
    }

    async fn cancel(&self, _class_id: i64) -> DomainResult<()> {
        Ok(())
    }

    async fn trainers(&self, _club_id: i64, _activity_id: &str) -> DomainResult<Vec<Trainer>> {
        Ok(Vec::new())
    }

    async fn activities(&self, _club_id: i64) -> DomainResult<Vec<Activity>> {
        Ok(Vec::new())
    }
}

/// Notifier double that records every call; slot delivery can be made
/// to fail to exercise the retry-on-next-sweep path.
#[derive(Default)]
struct RecordingNotifier {
    slot_notices: Mutex<Vec<(i64, i64)>>,
    confirmations: Mutex<Vec<(i64, i64, i64)>>,
    errors: Mutex<Vec<(i64, String)>>,
    fail_slot_delivery: AtomicBool,
}

impl RecordingNotifier {
    fn slot_notices(&self) -> Vec<(i64, i64)> {
        self.slot_notices.lock().unwrap().clone()
    }

    fn confirmations(&self) -> Vec<(i64, i64, i64)> {
        self.confirmations.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<(i64, String)> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_slot(&self, account_id: i64, slot: &Slot) -> DomainResult<()> {
        self.slot_notices.lock().unwrap().push((account_id, slot.id));
        if self.fail_slot_delivery.load(Ordering::SeqCst) {
            return Err(DomainError::DeliveryFailed("bot api is down".to_string()));
        }
        Ok(())
    }

    async fn confirm_auto_booking(
        &self,
        account_id: i64,
        slot: &Slot,
        filter: &Filter,
    ) -> DomainResult<()> {
        self.confirmations
            .lock()
            .unwrap()
            .push((account_id, slot.id, filter.id));
        Ok(())
    }

    async fn notify_error(&self, account_id: i64, text: &str) -> DomainResult<()> {
        self.errors.lock().unwrap().push((account_id, text.to_string()));
        Ok(())
    }
}

struct Harness {
    pool: SqlitePool,
    accounts: SqliteAccountRepository,
    filters: SqliteFilterRepository,
    bookings: SqliteBookingRepository,
    notifications: SqliteNotificationRepository,
    portal: Arc<StubPortal>,
    notifier: Arc<RecordingNotifier>,
    service: SweepService,
}

async fn harness(portal: StubPortal) -> Harness {
    let pool = setup_test_db().await;
    let accounts = SqliteAccountRepository::new(pool.clone());
    let filters = SqliteFilterRepository::new(pool.clone());
    let bookings = SqliteBookingRepository::new(pool.clone());
    let notifications = SqliteNotificationRepository::new(pool.clone());
    let portal = Arc::new(portal);
    let notifier = Arc::new(RecordingNotifier::default());

    let service = SweepService::new(
        Arc::new(accounts.clone()),
        Arc::new(filters.clone()),
        Arc::new(bookings.clone()),
        Arc::new(notifications.clone()),
        portal.clone(),
        notifier.clone(),
        SearchWindow::hours(48),
        FallbackTarget {
            club_id: CLUB_ID,
            club_name: CLUB_NAME.to_string(),
            activity_id: ACTIVITY_ID.to_string(),
        },
    );

    Harness {
        pool,
        accounts,
        filters,
        bookings,
        notifications,
        portal,
        notifier,
        service,
    }
}

fn slot(id: i64) -> Slot {
    Slot {
        id,
        name: "Fitness".to_string(),
        club_id: CLUB_ID,
        club_name: CLUB_NAME.to_string(),
        activity_id: ACTIVITY_ID.to_string(),
        trainer: None,
        start: "2026-03-02T18:00:00".parse().unwrap(),
        duration_minutes: 55,
        available_spots: 4,
    }
}

fn filter(account_id: i64, auto_booking: bool) -> NewFilter {
    NewFilter {
        account_id,
        club_id: CLUB_ID,
        club_name: CLUB_NAME.to_string(),
        activity_id: ACTIVITY_ID.to_string(),
        activity_name: "Fitness".to_string(),
        trainer: None,
        zone_id: None,
        zone_name: None,
        time_from: None,
        time_to: None,
        weekdays: None,
        auto_booking,
    }
}

#[tokio::test]
async fn test_matching_slot_is_notified_once() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(1, false)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.accounts_checked, 1);
    assert_eq!(report.candidates_evaluated, 1);
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(report.auto_booked, 0);
    assert_eq!(h.notifier.slot_notices(), vec![(1, 5001)]);
    assert!(h.notifications.is_notified(1, 5001).await.unwrap());

    // The mark suppresses the slot on the next sweep.
    let second = h.service.run_sweep().await.unwrap();
    assert_eq!(second.candidates_evaluated, 0);
    assert_eq!(second.notifications_sent, 0);
    assert_eq!(h.notifier.slot_notices().len(), 1);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_auto_booking_books_records_and_confirms() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    let filter_id = h.filters.insert(&filter(1, true)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.auto_booked, 1);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(h.portal.booked(), vec![5001]);
    assert!(h.notifier.slot_notices().is_empty());
    assert_eq!(h.notifier.confirmations(), vec![(1, 5001, filter_id)]);

    assert!(h.bookings.is_actively_booked(1, 5001).await.unwrap());
    assert_eq!(h.bookings.count_active_for_filter(1, filter_id).await.unwrap(), 1);
    let stored = &h.bookings.list_for_account(1).await.unwrap()[0];
    assert!(stored.is_auto_booked);
    assert_eq!(stored.filter_id, Some(filter_id));

    // Already booked: the next sweep does not book or notify again.
    let second = h.service.run_sweep().await.unwrap();
    assert_eq!(second.auto_booked, 0);
    assert_eq!(second.candidates_evaluated, 0);
    assert_eq!(h.portal.book_attempts().len(), 1);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_filter_at_cap_notifies_instead_of_booking() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    let filter_id = h.filters.insert(&filter(1, true)).await.unwrap();

    // Three active auto-bookings exhaust the filter's cap.
    for class_id in [9001, 9002, 9003] {
        h.bookings
            .insert(&NewBooking {
                account_id: 1,
                class_id,
                title: "Fitness".to_string(),
                start_time: "2026-03-01T18:00:00".parse().unwrap(),
                filter_id: Some(filter_id),
                is_auto_booked: true,
            })
            .await
            .unwrap();
    }

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.auto_booked, 0);
    assert_eq!(report.notifications_sent, 1);
    assert!(h.portal.book_attempts().is_empty());
    assert_eq!(h.notifier.slot_notices(), vec![(1, 5001)]);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_cancelling_frees_the_cap() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    let filter_id = h.filters.insert(&filter(1, true)).await.unwrap();

    for class_id in [9001, 9002, 9003] {
        h.bookings
            .insert(&NewBooking {
                account_id: 1,
                class_id,
                title: "Fitness".to_string(),
                start_time: "2026-03-01T18:00:00".parse().unwrap(),
                filter_id: Some(filter_id),
                is_auto_booked: true,
            })
            .await
            .unwrap();
    }
    h.bookings.cancel(1, 9002).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.auto_booked, 1);
    assert_eq!(h.portal.booked(), vec![5001]);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_booking_refusal_falls_back_to_notification() {
    let mut portal = StubPortal::with_slots(vec![slot(5001)]);
    portal.book_refusals.insert(5001);
    let h = harness(portal).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(1, true)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.auto_booked, 0);
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(h.portal.book_attempts(), vec![5001]);
    assert!(h.portal.booked().is_empty());
    assert_eq!(h.notifier.slot_notices(), vec![(1, 5001)]);
    assert!(!h.bookings.is_actively_booked(1, 5001).await.unwrap());

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_capped_filter_is_skipped_and_next_one_credited() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    let first = h.filters.insert(&filter(1, true)).await.unwrap();
    let second = h.filters.insert(&filter(1, true)).await.unwrap();

    // The first filter is at its cap; the second should take the slot.
    for class_id in [9001, 9002, 9003] {
        h.bookings
            .insert(&NewBooking {
                account_id: 1,
                class_id,
                title: "Fitness".to_string(),
                start_time: "2026-03-01T18:00:00".parse().unwrap(),
                filter_id: Some(first),
                is_auto_booked: true,
            })
            .await
            .unwrap();
    }

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.auto_booked, 1);
    assert_eq!(h.notifier.confirmations(), vec![(1, 5001, second)]);
    assert_eq!(h.bookings.count_active_for_filter(1, second).await.unwrap(), 1);
    assert_eq!(h.bookings.count_active_for_filter(1, first).await.unwrap(), 3);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_failed_delivery_is_retried_next_sweep() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(1, false)).await.unwrap();

    h.notifier.fail_slot_delivery.store(true, Ordering::SeqCst);
    let first = h.service.run_sweep().await.unwrap();
    assert_eq!(first.notifications_sent, 0);
    assert_eq!(h.notifier.slot_notices().len(), 1);
    // No mark on failure, so the slot stays eligible.
    assert!(!h.notifications.is_notified(1, 5001).await.unwrap());

    h.notifier.fail_slot_delivery.store(false, Ordering::SeqCst);
    let second = h.service.run_sweep().await.unwrap();
    assert_eq!(second.notifications_sent, 1);
    assert_eq!(h.notifier.slot_notices().len(), 2);
    assert!(h.notifications.is_notified(1, 5001).await.unwrap());

    // Delivered once: the third sweep stays quiet.
    let third = h.service.run_sweep().await.unwrap();
    assert_eq!(third.notifications_sent, 0);
    assert_eq!(h.notifier.slot_notices().len(), 2);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_dismissed_slot_never_resurfaces() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(1, false)).await.unwrap();
    h.notifications.mark_skipped(1, 5001).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.candidates_evaluated, 0);
    assert_eq!(report.notifications_sent, 0);
    assert!(h.notifier.slot_notices().is_empty());

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_rejected_login_is_reported_and_isolated() {
    let mut portal = StubPortal::with_slots(vec![slot(5001)]);
    portal.rejected_logins.insert("bad@example.com".to_string());
    let h = harness(portal).await;
    h.accounts.insert(&Account::new(101, "bad@example.com", "pw")).await.unwrap();
    h.accounts.insert(&Account::new(102, "good@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(102, false)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.accounts_checked, 2);
    assert_eq!(report.auth_failures, 1);
    assert_eq!(report.accounts_failed, 0);

    // The owner is told their credentials are bad; the other account's
    // check still runs to completion.
    assert_eq!(
        h.notifier.errors(),
        vec![(101, "Authentication error. Please check your credentials.".to_string())]
    );
    assert_eq!(h.notifier.slot_notices(), vec![(102, 5001)]);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_unreachable_portal_counts_as_account_failure() {
    let mut portal = StubPortal::with_slots(vec![slot(5001)]);
    portal.unreachable_logins.insert("down@example.com".to_string());
    let h = harness(portal).await;
    h.accounts.insert(&Account::new(101, "down@example.com", "pw")).await.unwrap();
    h.accounts.insert(&Account::new(102, "good@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(102, false)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.accounts_failed, 1);
    assert_eq!(report.auth_failures, 0);
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(h.notifier.slot_notices(), vec![(102, 5001)]);
    // No credential warning for an outage.
    assert!(h.notifier.errors().is_empty());

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_account_without_filters_polls_the_fallback_club() {
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(h.portal.queries(), vec![(CLUB_ID, ACTIVITY_ID.to_string())]);
    // Filterless candidates are notify-only.
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(report.auto_booked, 0);
    assert!(h.portal.book_attempts().is_empty());

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_empty_sweep_reports_zeroes() {
    let h = harness(StubPortal::default()).await;

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.accounts_checked, 0);
    assert_eq!(report.candidates_evaluated, 0);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_duplicate_slots_across_filters_become_one_candidate() {
    // Two filters over the same club and activity surface the same slot
    // twice; the sweep must notify once.
    let h = harness(StubPortal::with_slots(vec![slot(5001)])).await;
    h.accounts.insert(&Account::new(1, "a@example.com", "pw")).await.unwrap();
    h.filters.insert(&filter(1, false)).await.unwrap();
    h.filters.insert(&filter(1, false)).await.unwrap();

    let report = h.service.run_sweep().await.unwrap();
    assert_eq!(report.candidates_evaluated, 1);
    assert_eq!(report.notifications_sent, 1);
    assert_eq!(h.notifier.slot_notices(), vec![(1, 5001)]);
    // Both filters queried, one candidate evaluated.
    assert_eq!(h.portal.queries().len(), 2);

    teardown_test_db(h.pool).await;
}
