//! Classwatch - class availability monitor and auto-booking engine.
//!
//! Classwatch polls a PerfectGym-based fitness portal for bookable
//! group classes, matches them against per-account filters, books
//! matches automatically where allowed, and tells account owners about
//! the rest over Telegram.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): models, port traits, and errors
//! - **Service Layer** (`services`): filter matching, the sweep, and
//!   the hourly daemon
//! - **Adapters** (`adapters`): the SQLite store, the portal client,
//!   and the Telegram notifier, each behind a domain port
//! - **Infrastructure Layer** (`infrastructure`): configuration
//! - **CLI Layer** (`cli`): operator commands

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Account, Booking, Config, DatabaseConfig, Filter, LoggingConfig, MonitorConfig, NewBooking,
    NewFilter, SearchWindow, Slot, TelegramConfig, AUTO_BOOKING_CAP, MAX_FILTERS_PER_ACCOUNT,
};
pub use domain::ports::{
    AccountRepository, BookingGateway, BookingRepository, BookingSession, FilterRepository,
    Notifier, NotificationRepository,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::monitor_daemon::{MonitorDaemon, MonitorDaemonConfig};
pub use services::sweep::{SweepReport, SweepService};
