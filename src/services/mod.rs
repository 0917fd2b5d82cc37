//! Service layer: the filter-match engine, the per-account sweep with
//! its auto-booking decisions, and the hourly monitor daemon.

pub mod filter_match;
pub mod monitor_daemon;
pub mod sweep;

pub use filter_match::{collect_candidates, matches_slot, Candidate};
pub use monitor_daemon::{
    MonitorDaemon, MonitorDaemonConfig, MonitorEvent, MonitorHandle, MonitorStatus, StopReason,
};
pub use sweep::{FallbackTarget, SweepReport, SweepService};
