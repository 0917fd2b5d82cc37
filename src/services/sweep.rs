//! The sweep: one full pass over every registered account.
//!
//! For each account: authenticate, gather slots per filter (or for the
//! fallback club when the account has none), reduce them to candidates,
//! then auto-book or notify. Failures are contained at the account and
//! candidate level so one broken account or slot never stalls the rest.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Account, MonitorConfig, NewBooking, SearchWindow, Slot, AUTO_BOOKING_CAP,
};
use crate::domain::ports::{
    AccountRepository, BookingGateway, BookingRepository, BookingSession, FilterRepository,
    NotificationRepository, Notifier,
};
use crate::services::filter_match::{collect_candidates, Candidate};

const AUTH_ERROR_MESSAGE: &str = "Authentication error. Please check your credentials.";

/// Where to poll for accounts that have no filters.
#[derive(Debug, Clone)]
pub struct FallbackTarget {
    /// Club id to query.
    pub club_id: i64,
    /// Club display name carried into slots and messages.
    pub club_name: String,
    /// Activity/timetable id to query.
    pub activity_id: String,
}

impl From<&MonitorConfig> for FallbackTarget {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            club_id: config.default_club_id,
            club_name: config.default_club_name.clone(),
            activity_id: config.default_activity_id.clone(),
        }
    }
}

/// Counters from one sweep, for logging and daemon status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Accounts the sweep attempted.
    pub accounts_checked: u64,
    /// Accounts whose portal login was rejected.
    pub auth_failures: u64,
    /// Accounts that failed for any other reason.
    pub accounts_failed: u64,
    /// Candidates that reached the decision step.
    pub candidates_evaluated: u64,
    /// Classes booked without asking.
    pub auto_booked: u64,
    /// Slot notifications delivered.
    pub notifications_sent: u64,
}

/// The monitoring engine: authenticates accounts, matches slots, and
/// decides between auto-booking and notification.
pub struct SweepService {
    accounts: Arc<dyn AccountRepository>,
    filters: Arc<dyn FilterRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifications: Arc<dyn NotificationRepository>,
    gateway: Arc<dyn BookingGateway>,
    notifier: Arc<dyn Notifier>,
    window: SearchWindow,
    fallback: FallbackTarget,
}

impl SweepService {
    /// Wire up a sweep service from its ports.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        filters: Arc<dyn FilterRepository>,
        bookings: Arc<dyn BookingRepository>,
        notifications: Arc<dyn NotificationRepository>,
        gateway: Arc<dyn BookingGateway>,
        notifier: Arc<dyn Notifier>,
        window: SearchWindow,
        fallback: FallbackTarget,
    ) -> Self {
        Self {
            accounts,
            filters,
            bookings,
            notifications,
            gateway,
            notifier,
            window,
            fallback,
        }
    }

    /// Check every registered account once, sequentially.
    ///
    /// Only a failure to list accounts aborts the sweep; each account's
    /// check is independently caught and counted.
    pub async fn run_sweep(&self) -> DomainResult<SweepReport> {
        let accounts = self.accounts.list().await?;
        info!(count = accounts.len(), "Starting sweep");
        if accounts.is_empty() {
            warn!("No accounts registered");
        }

        let mut report = SweepReport::default();
        for account in &accounts {
            report.accounts_checked += 1;
            if let Err(err) = self.check_account(account, &mut report).await {
                report.accounts_failed += 1;
                error!(account_id = account.id, error = %err, "Account check failed");
            }
        }

        info!(
            accounts = report.accounts_checked,
            auto_booked = report.auto_booked,
            notifications = report.notifications_sent,
            "Sweep completed"
        );
        Ok(report)
    }

    async fn check_account(&self, account: &Account, report: &mut SweepReport) -> DomainResult<()> {
        info!(account_id = account.id, "Checking account");

        let session = match self.gateway.login(account.credentials()).await {
            Ok(session) => session,
            Err(DomainError::AuthenticationFailed(reason)) => {
                report.auth_failures += 1;
                warn!(account_id = account.id, %reason, "Portal rejected credentials");
                if let Err(err) = self.notifier.notify_error(account.id, AUTH_ERROR_MESSAGE).await
                {
                    warn!(account_id = account.id, error = %err, "Could not deliver auth-error notice");
                }
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        let filters = self.filters.list_for_account(account.id).await?;
        debug!(account_id = account.id, filters = filters.len(), "Loaded filters");

        let mut raw_slots: Vec<Slot> = Vec::new();
        if filters.is_empty() {
            debug!(account_id = account.id, club_id = self.fallback.club_id, "No filters, polling fallback club");
            raw_slots = session
                .available_slots(
                    self.fallback.club_id,
                    &self.fallback.club_name,
                    &self.fallback.activity_id,
                    self.window,
                )
                .await?;
        } else {
            for filter in &filters {
                match session
                    .available_slots(filter.club_id, &filter.club_name, &filter.activity_id, self.window)
                    .await
                {
                    Ok(slots) => {
                        debug!(
                            account_id = account.id,
                            filter_id = filter.id,
                            count = slots.len(),
                            "Retrieved slots for filter"
                        );
                        raw_slots.extend(slots);
                    }
                    Err(err) => {
                        warn!(account_id = account.id, filter_id = filter.id, error = %err, "Slot query failed for filter, skipping it");
                    }
                }
            }
        }

        let candidates = collect_candidates(&raw_slots, &filters);
        if candidates.is_empty() {
            info!(account_id = account.id, "No matching classes");
            return Ok(());
        }
        debug!(account_id = account.id, candidates = candidates.len(), "Evaluating candidates");

        for candidate in &candidates {
            if let Err(err) = self
                .process_candidate(session.as_ref(), account.id, candidate, report)
                .await
            {
                warn!(
                    account_id = account.id,
                    class_id = candidate.slot.id,
                    error = %err,
                    "Candidate processing failed, moving on"
                );
            }
        }
        Ok(())
    }

    /// Decide one candidate: skip if already handled, else auto-book or
    /// notify.
    async fn process_candidate(
        &self,
        session: &dyn BookingSession,
        account_id: i64,
        candidate: &Candidate,
        report: &mut SweepReport,
    ) -> DomainResult<()> {
        let slot = &candidate.slot;

        if self.bookings.is_actively_booked(account_id, slot.id).await? {
            debug!(account_id, class_id = slot.id, "Already booked, skipping");
            return Ok(());
        }
        if self.notifications.is_skipped(account_id, slot.id).await? {
            debug!(account_id, class_id = slot.id, "Dismissed earlier, skipping");
            return Ok(());
        }
        if self.notifications.is_notified(account_id, slot.id).await? {
            debug!(account_id, class_id = slot.id, "Already notified, skipping");
            return Ok(());
        }

        report.candidates_evaluated += 1;

        if self.try_auto_book(session, account_id, candidate, report).await? {
            return Ok(());
        }

        match self.notifier.notify_slot(account_id, slot).await {
            Ok(()) => {
                self.notifications.mark_notified(account_id, slot).await?;
                report.notifications_sent += 1;
                info!(account_id, class_id = slot.id, "Notified about slot");
            }
            Err(err) => {
                // No marker on failure; the slot stays eligible and the
                // next sweep retries delivery.
                warn!(account_id, class_id = slot.id, error = %err, "Notification delivery failed, will retry next sweep");
            }
        }
        Ok(())
    }

    /// Try the candidate's auto-booking filters in stored order; the
    /// first one under its cap that books successfully is credited.
    async fn try_auto_book(
        &self,
        session: &dyn BookingSession,
        account_id: i64,
        candidate: &Candidate,
        report: &mut SweepReport,
    ) -> DomainResult<bool> {
        let slot = &candidate.slot;

        for filter in candidate.filters.iter().filter(|f| f.auto_booking) {
            let active = self
                .bookings
                .count_active_for_filter(account_id, filter.id)
                .await?;
            if active >= AUTO_BOOKING_CAP {
                info!(
                    account_id,
                    filter_id = filter.id,
                    active,
                    class_id = slot.id,
                    "Filter at the booking cap, not auto-booking"
                );
                continue;
            }

            match session.book(slot.id).await {
                Ok(()) => {
                    self.bookings
                        .insert(&NewBooking::auto_booked(account_id, slot, filter.id))
                        .await?;
                    report.auto_booked += 1;
                    info!(account_id, class_id = slot.id, filter_id = filter.id, "Auto-booked class");

                    if let Err(err) = self
                        .notifier
                        .confirm_auto_booking(account_id, slot, filter)
                        .await
                    {
                        // The reservation already exists upstream; never
                        // unwind it over a lost confirmation.
                        warn!(account_id, class_id = slot.id, error = %err, "Auto-booking confirmation failed");
                    }
                    return Ok(true);
                }
                Err(err) => {
                    warn!(account_id, class_id = slot.id, filter_id = filter.id, error = %err, "Booking attempt refused");
                }
            }
        }
        Ok(false)
    }
}
