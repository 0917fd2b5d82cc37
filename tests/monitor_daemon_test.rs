//! Integration tests for the monitor daemon: event stream, stop handle,
//! failure cutoff, and the per-run timeout.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use classwatch::adapters::sqlite::{
    SqliteAccountRepository, SqliteBookingRepository, SqliteFilterRepository,
    SqliteNotificationRepository,
};
use classwatch::domain::errors::{DomainError, DomainResult};
use classwatch::domain::models::{Account, Credentials, Filter, SearchWindow, Slot};
use classwatch::domain::ports::{
    AccountRepository, BookingGateway, BookingSession, Notifier,
};
use classwatch::services::{
    FallbackTarget, MonitorDaemon, MonitorDaemonConfig, MonitorEvent, StopReason, SweepService,
};
use tokio::sync::mpsc;

use helpers::database::{setup_test_db, teardown_test_db};

/// Gateway for sweeps that never reach the portal (no accounts, or the
/// account listing itself fails).
struct IdlePortal;

#[async_trait]
impl BookingGateway for IdlePortal {
    async fn login(&self, _credentials: Credentials<'_>) -> DomainResult<Box<dyn BookingSession>> {
        unreachable!("no sweep in these tests should reach the portal")
    }
}

struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify_slot(&self, _account_id: i64, _slot: &Slot) -> DomainResult<()> {
        Ok(())
    }

    async fn confirm_auto_booking(
        &self,
        _account_id: i64,
        _slot: &Slot,
        _filter: &Filter,
    ) -> DomainResult<()> {
        Ok(())
    }

    async fn notify_error(&self, _account_id: i64, _text: &str) -> DomainResult<()> {
        Ok(())
    }
}

/// Account store whose listing always fails, sinking every sweep.
struct BrokenAccountStore;

#[async_trait]
impl AccountRepository for BrokenAccountStore {
    async fn insert(&self, _account: &Account) -> DomainResult<()> {
        unreachable!()
    }

    async fn get(&self, _id: i64) -> DomainResult<Option<Account>> {
        unreachable!()
    }

    async fn get_by_email(&self, _email: &str) -> DomainResult<Option<Account>> {
        unreachable!()
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        Err(DomainError::DatabaseError("disk I/O error".to_string()))
    }

    async fn remove(&self, _id: i64) -> DomainResult<()> {
        unreachable!()
    }
}

/// Account store whose listing never returns within the tests' budget.
struct StalledAccountStore;

#[async_trait]
impl AccountRepository for StalledAccountStore {
    async fn insert(&self, _account: &Account) -> DomainResult<()> {
        unreachable!()
    }

    async fn get(&self, _id: i64) -> DomainResult<Option<Account>> {
        unreachable!()
    }

    async fn get_by_email(&self, _email: &str) -> DomainResult<Option<Account>> {
        unreachable!()
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn remove(&self, _id: i64) -> DomainResult<()> {
        unreachable!()
    }
}

fn fallback() -> FallbackTarget {
    FallbackTarget {
        club_id: 7,
        club_name: "Zdrofit Bemowo Dywizjonu 303".to_string(),
        activity_id: "20".to_string(),
    }
}

fn sweep_with_accounts(
    accounts: Arc<dyn AccountRepository>,
    pool: &sqlx::SqlitePool,
) -> Arc<SweepService> {
    Arc::new(SweepService::new(
        accounts,
        Arc::new(SqliteFilterRepository::new(pool.clone())),
        Arc::new(SqliteBookingRepository::new(pool.clone())),
        Arc::new(SqliteNotificationRepository::new(pool.clone())),
        Arc::new(IdlePortal),
        Arc::new(SilentNotifier),
        SearchWindow::hours(48),
        fallback(),
    ))
}

async fn next_event(rx: &mut mpsc::Receiver<MonitorEvent>) -> MonitorEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a daemon event")
        .expect("event channel closed early")
}

#[tokio::test]
async fn test_daemon_sweeps_on_fast_ticks_and_stops_on_request() {
    let pool = setup_test_db().await;
    let sweep = sweep_with_accounts(Arc::new(SqliteAccountRepository::new(pool.clone())), &pool);
    let daemon = MonitorDaemon::new(sweep, MonitorDaemonConfig::frequent());
    let handle = daemon.handle();

    let mut events = daemon.run().await;

    assert!(matches!(next_event(&mut events).await, MonitorEvent::Started));
    assert!(matches!(
        next_event(&mut events).await,
        MonitorEvent::SweepStarted { run_number: 1 }
    ));
    match next_event(&mut events).await {
        MonitorEvent::SweepCompleted { run_number, report, .. } => {
            assert_eq!(run_number, 1);
            assert_eq!(report.accounts_checked, 0);
        }
        other => panic!("expected SweepCompleted, got {other:?}"),
    }

    assert!(!handle.is_stop_requested());
    handle.stop();
    assert!(handle.is_stop_requested());
    // Ticks already in flight may still complete; drain to the stop.
    loop {
        if let MonitorEvent::Stopped { reason } = next_event(&mut events).await {
            assert_eq!(reason, StopReason::Requested);
            break;
        }
    }

    let status = handle.status().await;
    assert!(!status.running);
    assert!(status.total_runs >= 1);
    assert_eq!(status.failed_runs, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_daemon_gives_up_after_consecutive_failures() {
    let pool = setup_test_db().await;
    let sweep = sweep_with_accounts(Arc::new(BrokenAccountStore), &pool);
    let daemon = MonitorDaemon::new(sweep, MonitorDaemonConfig::frequent());
    let handle = daemon.handle();

    let mut events = daemon.run().await;

    let mut failures = 0;
    loop {
        match next_event(&mut events).await {
            MonitorEvent::SweepFailed { error, .. } => {
                assert!(error.contains("disk I/O error"));
                failures += 1;
            }
            MonitorEvent::Stopped { reason } => {
                assert_eq!(reason, StopReason::TooManyFailures);
                break;
            }
            _ => {}
        }
    }
    // frequent() tolerates three consecutive failures.
    assert_eq!(failures, 3);

    // The loop is gone; the channel closes behind the stop event.
    assert!(events.recv().await.is_none());
    let status = handle.status().await;
    assert!(!status.running);
    assert_eq!(status.failed_runs, 3);
    assert_eq!(status.successful_runs, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_run_once_reports_an_empty_sweep() {
    let pool = setup_test_db().await;
    let sweep = sweep_with_accounts(Arc::new(SqliteAccountRepository::new(pool.clone())), &pool);
    let daemon = MonitorDaemon::new(sweep, MonitorDaemonConfig::default());

    let report = daemon.run_once().await.expect("sweep failed");
    assert_eq!(report.accounts_checked, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_run_once_abandons_an_overrunning_sweep() {
    let pool = setup_test_db().await;
    let sweep = sweep_with_accounts(Arc::new(StalledAccountStore), &pool);
    let daemon = MonitorDaemon::new(
        sweep,
        MonitorDaemonConfig::with_timeout(Duration::from_millis(50)),
    );

    let err = daemon.run_once().await.expect_err("sweep should time out");
    match err {
        DomainError::TransientNetwork(reason) => assert!(reason.contains("run timeout")),
        other => panic!("expected TransientNetwork, got {other:?}"),
    }

    teardown_test_db(pool).await;
}
