//! CLI command implementations.

pub mod account;
pub mod calendar;
pub mod catalog;
pub mod check;
pub mod filter;
pub mod init;
pub mod run;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;

use crate::adapters::perfectgym::PerfectGymGateway;
use crate::adapters::sqlite::{
    initialize_database, SqliteAccountRepository, SqliteBookingRepository, SqliteFilterRepository,
    SqliteNotificationRepository,
};
use crate::adapters::telegram::TelegramNotifier;
use crate::domain::models::{Account, Config, SearchWindow};
use crate::domain::ports::{AccountRepository, BookingGateway, BookingSession};
use crate::infrastructure::config::ConfigLoader;
use crate::services::sweep::{FallbackTarget, SweepService};

/// Shared wiring for commands that touch the store or the portal.
pub struct AppContext {
    /// Merged configuration.
    pub config: Config,
    /// Open database pool.
    pub pool: SqlitePool,
}

impl AppContext {
    /// Load configuration and open (creating if needed) the database.
    pub async fn open() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let pool = initialize_database(&config.database.path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open database at {}. Run 'classwatch init' first.",
                    config.database.path
                )
            })?;
        Ok(Self { config, pool })
    }

    /// Account store.
    pub fn accounts(&self) -> SqliteAccountRepository {
        SqliteAccountRepository::new(self.pool.clone())
    }

    /// Filter store.
    pub fn filters(&self) -> SqliteFilterRepository {
        SqliteFilterRepository::new(self.pool.clone())
    }

    /// Booking store.
    pub fn bookings(&self) -> SqliteBookingRepository {
        SqliteBookingRepository::new(self.pool.clone())
    }

    /// Notification-marker store.
    pub fn notifications(&self) -> SqliteNotificationRepository {
        SqliteNotificationRepository::new(self.pool.clone())
    }

    /// Portal gateway.
    pub fn gateway(&self) -> PerfectGymGateway {
        PerfectGymGateway::new(self.config.booking_service.clone())
    }

    /// Telegram notifier; fails when no bot token is configured.
    pub fn notifier(&self) -> Result<TelegramNotifier> {
        if self.config.telegram.bot_token.is_empty() {
            bail!(
                "No Telegram bot token configured. Set telegram.bot_token in \
                 .classwatch/config.yaml or CLASSWATCH_TELEGRAM__BOT_TOKEN."
            );
        }
        Ok(TelegramNotifier::new(self.config.telegram.clone()))
    }

    /// The monitoring engine, wired against this context's store,
    /// portal, and notifier.
    pub fn sweep_service(&self) -> Result<SweepService> {
        let notifier = self.notifier()?;
        Ok(SweepService::new(
            Arc::new(self.accounts()),
            Arc::new(self.filters()),
            Arc::new(self.bookings()),
            Arc::new(self.notifications()),
            Arc::new(self.gateway()),
            Arc::new(notifier),
            SearchWindow::hours(self.config.booking_service.search_window_hours),
            FallbackTarget::from(&self.config.monitor),
        ))
    }

    /// Fetch an account and log it into the portal.
    pub async fn login(&self, account_id: i64) -> Result<(Account, Box<dyn BookingSession>)> {
        let account = self
            .accounts()
            .get(account_id)
            .await?
            .with_context(|| format!("No account with id {account_id}"))?;
        let session = self
            .gateway()
            .login(account.credentials())
            .await
            .with_context(|| format!("Login failed for {}", account.email))?;
        Ok((account, session))
    }
}
