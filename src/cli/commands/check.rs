//! Check CLI command: one sweep, right now.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::cli::commands::AppContext;
use crate::cli::{output, CommandOutput};
use crate::services::monitor_daemon::{MonitorDaemon, MonitorDaemonConfig};
use crate::services::sweep::SweepReport;

#[derive(Args, Debug)]
pub struct CheckArgs {}

#[derive(Debug, serde::Serialize)]
pub struct CheckOutput {
    pub success: bool,
    pub report: SweepReport,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        let mut lines = vec![format!(
            "Sweep complete: {} account(s) checked, {} candidate(s) evaluated.",
            r.accounts_checked, r.candidates_evaluated
        )];
        lines.push(format!(
            "  auto-booked: {}, notifications sent: {}",
            r.auto_booked, r.notifications_sent
        ));
        if r.auth_failures > 0 || r.accounts_failed > 0 {
            lines.push(format!(
                "  auth failures: {}, other failures: {}",
                r.auth_failures, r.accounts_failed
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(_args: CheckArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let sweep = Arc::new(ctx.sweep_service()?);

    let timeout = Duration::from_secs(ctx.config.monitor.per_run_timeout_secs);
    let daemon = MonitorDaemon::new(sweep, MonitorDaemonConfig::with_timeout(timeout));
    let report = daemon.run_once().await?;

    output(&CheckOutput { success: true, report }, json_mode);
    Ok(())
}
