//! Run CLI command: the hourly monitoring daemon.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::commands::AppContext;
use crate::services::monitor_daemon::{
    MonitorDaemon, MonitorDaemonConfig, MonitorEvent, StopReason,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Sweep immediately on startup instead of waiting for the next
    /// top of the hour
    #[arg(long)]
    pub now: bool,
}

fn print_event(event: &MonitorEvent, json_mode: bool) {
    if json_mode {
        let payload = match event {
            MonitorEvent::Started => serde_json::json!({"event": "started"}),
            MonitorEvent::SweepStarted { run_number } => {
                serde_json::json!({"event": "sweep_started", "run": run_number})
            }
            MonitorEvent::SweepCompleted { run_number, report, duration_ms } => {
                serde_json::json!({
                    "event": "sweep_completed",
                    "run": run_number,
                    "duration_ms": duration_ms,
                    "report": report,
                })
            }
            MonitorEvent::SweepFailed { run_number, error } => {
                serde_json::json!({"event": "sweep_failed", "run": run_number, "error": error})
            }
            MonitorEvent::SweepTimedOut { run_number } => {
                serde_json::json!({"event": "sweep_timed_out", "run": run_number})
            }
            MonitorEvent::Stopped { reason } => {
                serde_json::json!({"event": "stopped", "reason": format!("{reason:?}")})
            }
        };
        println!("{payload}");
        return;
    }

    match event {
        MonitorEvent::Started => {
            println!("Monitoring started; sweeping at the top of every hour. Ctrl-C to stop.");
        }
        MonitorEvent::SweepStarted { run_number } => {
            println!("[run {run_number}] sweep started");
        }
        MonitorEvent::SweepCompleted { run_number, report, duration_ms } => {
            println!(
                "[run {run_number}] done in {duration_ms}ms: {} account(s), {} auto-booked, {} notified",
                report.accounts_checked, report.auto_booked, report.notifications_sent
            );
        }
        MonitorEvent::SweepFailed { run_number, error } => {
            println!("[run {run_number}] failed: {error}");
        }
        MonitorEvent::SweepTimedOut { run_number } => {
            println!("[run {run_number}] timed out and was abandoned");
        }
        MonitorEvent::Stopped { reason } => match reason {
            StopReason::Requested => println!("Monitoring stopped."),
            StopReason::TooManyFailures => {
                println!("Monitoring stopped after repeated sweep failures.");
            }
        },
    }
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let sweep = Arc::new(ctx.sweep_service()?);

    let timeout = Duration::from_secs(ctx.config.monitor.per_run_timeout_secs);
    let mut config = MonitorDaemonConfig::with_timeout(timeout);
    config.run_on_startup = args.now;

    let daemon = MonitorDaemon::new(sweep, config);
    let handle = daemon.handle();
    let mut events = daemon.run().await;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupt received, stopping after the current sweep");
                handle.stop();
            }
            event = events.recv() => {
                match event {
                    Some(event @ MonitorEvent::Stopped { .. }) => {
                        print_event(&event, json_mode);
                        break;
                    }
                    Some(event) => print_event(&event, json_mode),
                    None => break,
                }
            }
        }
    }

    Ok(())
}
