//! Hourly monitoring daemon.
//!
//! Fires the sweep at the top of every wall-clock hour and bounds each
//! run with a hard timeout. Running state lives here and nowhere else;
//! the handle's stop flag halts the timer before anything else is torn
//! down and never cancels a sweep already in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use tokio::sync::{mpsc, RwLock};
use tokio::time::{timeout, Instant};
use tracing::{error, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::services::sweep::{SweepReport, SweepService};

/// How often a sleeping daemon rechecks its stop flag.
const STOP_POLL: Duration = Duration::from_secs(1);

/// Configuration for the monitor daemon.
#[derive(Debug, Clone)]
pub struct MonitorDaemonConfig {
    /// Fixed interval between sweeps. `None` means the production
    /// cadence: the top of every hour.
    pub tick_interval: Option<Duration>,
    /// Whether to sweep immediately on start instead of waiting for the
    /// first tick.
    pub run_on_startup: bool,
    /// Consecutive sweep failures tolerated before the daemon gives up.
    pub max_consecutive_failures: u32,
    /// Hard ceiling on one sweep; an overrunning sweep is abandoned.
    pub per_run_timeout: Duration,
}

impl Default for MonitorDaemonConfig {
    fn default() -> Self {
        Self {
            tick_interval: None,
            run_on_startup: false,
            max_consecutive_failures: 5,
            per_run_timeout: Duration::from_secs(300),
        }
    }
}

impl MonitorDaemonConfig {
    /// Production cadence with the configured per-run timeout.
    pub fn with_timeout(per_run_timeout: Duration) -> Self {
        Self {
            per_run_timeout,
            ..Default::default()
        }
    }

    /// Config for rapid ticking (testing).
    pub fn frequent() -> Self {
        Self {
            tick_interval: Some(Duration::from_millis(50)),
            run_on_startup: true,
            max_consecutive_failures: 3,
            per_run_timeout: Duration::from_secs(30),
        }
    }
}

/// Event emitted by the monitor daemon.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Daemon started.
    Started,
    /// A sweep began.
    SweepStarted {
        /// Ordinal of the run, starting at 1.
        run_number: u64,
    },
    /// A sweep finished.
    SweepCompleted {
        /// Ordinal of the run.
        run_number: u64,
        /// What the sweep did.
        report: SweepReport,
        /// Wall time the sweep took.
        duration_ms: u64,
    },
    /// A sweep returned an error.
    SweepFailed {
        /// Ordinal of the run.
        run_number: u64,
        /// The error text.
        error: String,
    },
    /// A sweep overran the per-run timeout and was abandoned.
    SweepTimedOut {
        /// Ordinal of the run.
        run_number: u64,
    },
    /// Daemon stopped.
    Stopped {
        /// Why it stopped.
        reason: StopReason,
    },
}

/// Reason the daemon stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Requested through the handle.
    Requested,
    /// Too many consecutive sweep failures.
    TooManyFailures,
}

/// Snapshot of the daemon's state.
#[derive(Debug, Clone, Default)]
pub struct MonitorStatus {
    /// Whether the daemon loop is alive.
    pub running: bool,
    /// Sweeps attempted.
    pub total_runs: u64,
    /// Sweeps that completed.
    pub successful_runs: u64,
    /// Sweeps that failed or timed out.
    pub failed_runs: u64,
    /// When the last sweep finished.
    pub last_run: Option<Instant>,
    /// Classes auto-booked over the daemon's lifetime.
    pub total_auto_booked: u64,
    /// Notifications delivered over the daemon's lifetime.
    pub total_notifications: u64,
}

/// Handle to control a running daemon.
pub struct MonitorHandle {
    stop_flag: Arc<AtomicBool>,
    status: Arc<RwLock<MonitorStatus>>,
}

impl MonitorHandle {
    /// Request the daemon to stop. No further sweeps start; a sweep in
    /// flight runs to completion (or its timeout).
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// Whether stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    /// Current daemon status.
    pub async fn status(&self) -> MonitorStatus {
        self.status.read().await.clone()
    }
}

/// The monitoring daemon.
pub struct MonitorDaemon {
    sweep: Arc<SweepService>,
    config: MonitorDaemonConfig,
    status: Arc<RwLock<MonitorStatus>>,
    stop_flag: Arc<AtomicBool>,
}

impl MonitorDaemon {
    /// Create a daemon around a sweep service.
    pub fn new(sweep: Arc<SweepService>, config: MonitorDaemonConfig) -> Self {
        Self {
            sweep,
            config,
            status: Arc::new(RwLock::new(MonitorStatus::default())),
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a handle to control the daemon.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            stop_flag: self.stop_flag.clone(),
            status: self.status.clone(),
        }
    }

    /// Start the daemon, returning its event channel.
    pub async fn run(self) -> mpsc::Receiver<MonitorEvent> {
        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(async move {
            self.run_loop(tx).await;
        });
        rx
    }

    /// Run one sweep immediately, bounded by the per-run timeout.
    pub async fn run_once(&self) -> DomainResult<SweepReport> {
        match timeout(self.config.per_run_timeout, self.sweep.run_sweep()).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::TransientNetwork(format!(
                "sweep exceeded the {}s run timeout",
                self.config.per_run_timeout.as_secs()
            ))),
        }
    }

    /// Current status.
    pub async fn status(&self) -> MonitorStatus {
        self.status.read().await.clone()
    }

    /// The daemon's configuration.
    pub fn config(&self) -> &MonitorDaemonConfig {
        &self.config
    }

    async fn run_loop(self, tx: mpsc::Sender<MonitorEvent>) {
        {
            let mut status = self.status.write().await;
            status.running = true;
        }
        let _ = tx.send(MonitorEvent::Started).await;
        match self.config.tick_interval {
            Some(interval) => info!(interval_ms = interval.as_millis() as u64, "Monitor daemon started"),
            None => info!("Monitor daemon started, sweeping at the top of every hour"),
        }

        let mut consecutive_failures = 0u32;
        let mut reason = StopReason::Requested;

        if self.config.run_on_startup && !self.stop_flag.load(Ordering::Acquire) {
            self.run_sweep_cycle(&tx, &mut consecutive_failures).await;
        }

        loop {
            if consecutive_failures >= self.config.max_consecutive_failures {
                error!(consecutive_failures, "Stopping after repeated sweep failures");
                reason = StopReason::TooManyFailures;
                break;
            }
            if !self.wait_for_tick().await {
                break;
            }
            self.run_sweep_cycle(&tx, &mut consecutive_failures).await;
        }

        {
            let mut status = self.status.write().await;
            status.running = false;
        }
        info!(?reason, "Monitor daemon stopped");
        let _ = tx.send(MonitorEvent::Stopped { reason }).await;
    }

    /// Sleep until the next firing. Returns false if stop was requested
    /// while waiting.
    async fn wait_for_tick(&self) -> bool {
        let deadline = Instant::now() + self.tick_wait();
        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            tokio::time::sleep(remaining.min(STOP_POLL)).await;
        }
    }

    fn tick_wait(&self) -> Duration {
        match self.config.tick_interval {
            Some(interval) => interval,
            None => Duration::from_secs(seconds_until_next_hour(Local::now().naive_local())),
        }
    }

    async fn run_sweep_cycle(&self, tx: &mpsc::Sender<MonitorEvent>, consecutive_failures: &mut u32) {
        let run_number = {
            let mut status = self.status.write().await;
            status.total_runs += 1;
            status.total_runs
        };

        let _ = tx.send(MonitorEvent::SweepStarted { run_number }).await;

        let start = Instant::now();
        let outcome = timeout(self.config.per_run_timeout, self.sweep.run_sweep()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(report)) => {
                *consecutive_failures = 0;
                {
                    let mut status = self.status.write().await;
                    status.successful_runs += 1;
                    status.last_run = Some(Instant::now());
                    status.total_auto_booked += report.auto_booked;
                    status.total_notifications += report.notifications_sent;
                }
                let _ = tx
                    .send(MonitorEvent::SweepCompleted {
                        run_number,
                        report,
                        duration_ms,
                    })
                    .await;
            }
            Ok(Err(err)) => {
                *consecutive_failures += 1;
                {
                    let mut status = self.status.write().await;
                    status.failed_runs += 1;
                }
                error!(run_number, error = %err, "Sweep failed");
                let _ = tx
                    .send(MonitorEvent::SweepFailed {
                        run_number,
                        error: err.to_string(),
                    })
                    .await;
            }
            Err(_) => {
                *consecutive_failures += 1;
                {
                    let mut status = self.status.write().await;
                    status.failed_runs += 1;
                }
                // Abandoned, not retried mid-cycle; the next tick starts fresh.
                error!(
                    run_number,
                    timeout_secs = self.config.per_run_timeout.as_secs(),
                    "Sweep timed out"
                );
                let _ = tx.send(MonitorEvent::SweepTimedOut { run_number }).await;
            }
        }
    }
}

/// Seconds from `now` to the next top of an hour (1..=3600).
fn seconds_until_next_hour(now: NaiveDateTime) -> u64 {
    let past = u64::from(now.minute()) * 60 + u64::from(now.second());
    3_600 - past
}
