//! Filter CLI commands.

use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use clap::{builder::BoolishValueParser, Args, Subcommand};
use comfy_table::Cell;

use crate::adapters::sqlite::TIME_FORMAT;
use crate::cli::commands::AppContext;
use crate::cli::{list_table, output, CommandOutput};
use crate::domain::models::{club_name, Filter, NewFilter, WeekdaySet, AUTO_BOOKING_CAP};
use crate::domain::ports::{AccountRepository, BookingRepository, FilterRepository};

#[derive(Args, Debug)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub command: FilterCommands,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Create a filter (up to 3 per account)
    Add {
        /// Owning account id
        #[arg(long)]
        account: i64,

        /// Club id to watch (see `classwatch catalog clubs`)
        #[arg(long)]
        club: i64,

        /// Activity/timetable id (see `classwatch catalog activities`)
        #[arg(long)]
        activity: String,

        /// Activity display name; defaults to the id
        #[arg(long)]
        activity_name: Option<String>,

        /// Club display name; defaults to the built-in catalog entry
        #[arg(long)]
        club_name: Option<String>,

        /// Only classes taught by this trainer (case-insensitive)
        #[arg(long)]
        trainer: Option<String>,

        /// Zone id, kept for the portal's zone-aware views
        #[arg(long)]
        zone: Option<i64>,

        /// Zone display name
        #[arg(long)]
        zone_name: Option<String>,

        /// Earliest class start, HH:MM inclusive
        #[arg(long)]
        time_from: Option<String>,

        /// Latest class start, HH:MM inclusive
        #[arg(long)]
        time_to: Option<String>,

        /// Weekdays as ISO numbers, e.g. 1,2,3,4,5 (Mon=1)
        #[arg(long)]
        weekdays: Option<String>,

        /// Book matches without asking, up to 3 active bookings
        #[arg(long)]
        auto: bool,
    },
    /// List an account's filters
    List {
        /// Account id
        #[arg(long)]
        account: i64,
    },
    /// Delete a filter
    Remove {
        /// Filter id
        id: i64,
    },
    /// Turn a filter's auto-booking on or off
    Auto {
        /// Filter id
        id: i64,
        /// on or off
        #[arg(value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct FilterView {
    pub id: i64,
    pub account_id: i64,
    pub club_id: i64,
    pub club_name: String,
    pub activity_id: String,
    pub activity_name: String,
    pub trainer: Option<String>,
    pub weekdays: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub auto_booking: bool,
    /// Active auto-bookings credited to this filter, out of the cap.
    pub active_bookings: i64,
}

impl FilterView {
    fn new(filter: &Filter, active_bookings: i64) -> Self {
        Self {
            id: filter.id,
            account_id: filter.account_id,
            club_id: filter.club_id,
            club_name: filter.club_name.clone(),
            activity_id: filter.activity_id.clone(),
            activity_name: filter.activity_name.clone(),
            trainer: filter.trainer.clone(),
            weekdays: filter.weekdays.map(WeekdaySet::to_csv),
            time_from: filter.time_from.map(|t| t.format(TIME_FORMAT).to_string()),
            time_to: filter.time_to.map(|t| t.format(TIME_FORMAT).to_string()),
            auto_booking: filter.auto_booking,
            active_bookings,
        }
    }

    fn time_window(&self) -> String {
        match (&self.time_from, &self.time_to) {
            (None, None) => "-".to_string(),
            (from, to) => format!(
                "{}-{}",
                from.as_deref().unwrap_or(""),
                to.as_deref().unwrap_or("")
            ),
        }
    }

    fn auto_column(&self) -> String {
        if self.auto_booking {
            format!("on ({}/{})", self.active_bookings, AUTO_BOOKING_CAP)
        } else {
            "off".to_string()
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FilterListOutput {
    pub account_id: i64,
    pub filters: Vec<FilterView>,
    pub total: usize,
}

impl CommandOutput for FilterListOutput {
    fn to_human(&self) -> String {
        if self.filters.is_empty() {
            return format!(
                "No filters for account {}. The monitor falls back to the default club.",
                self.account_id
            );
        }

        let mut table =
            list_table(&["id", "club", "activity", "trainer", "days", "time", "auto"]);
        for filter in &self.filters {
            table.add_row(vec![
                Cell::new(filter.id),
                Cell::new(&filter.club_name),
                Cell::new(&filter.activity_name),
                Cell::new(filter.trainer.as_deref().unwrap_or("-")),
                Cell::new(filter.weekdays.as_deref().unwrap_or("-")),
                Cell::new(filter.time_window()),
                Cell::new(filter.auto_column()),
            ]);
        }
        format!("{} filter(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FilterActionOutput {
    pub success: bool,
    pub message: String,
    pub filter_id: Option<i64>,
}

impl CommandOutput for FilterActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn parse_time(value: &str, flag: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .with_context(|| format!("Invalid {flag} '{value}'; expected HH:MM"))
}

pub async fn execute(args: FilterArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let repo = ctx.filters();

    match args.command {
        FilterCommands::Add {
            account,
            club,
            activity,
            activity_name,
            club_name: club_name_arg,
            trainer,
            zone,
            zone_name,
            time_from,
            time_to,
            weekdays,
            auto,
        } => {
            if ctx.accounts().get(account).await?.is_none() {
                bail!("No account with id {account}");
            }

            let club_name = match club_name_arg {
                Some(name) => name,
                None => club_name(club)
                    .map(str::to_string)
                    .with_context(|| {
                        format!("Club {club} is not in the built-in catalog; pass --club-name")
                    })?,
            };

            let time_from = time_from.as_deref().map(|s| parse_time(s, "--time-from")).transpose()?;
            let time_to = time_to.as_deref().map(|s| parse_time(s, "--time-to")).transpose()?;
            if let (Some(from), Some(to)) = (time_from, time_to) {
                if from > to {
                    bail!("--time-from must not be later than --time-to");
                }
            }
            let weekdays = weekdays.as_deref().map(WeekdaySet::from_csv).transpose()?;

            let new_filter = NewFilter {
                account_id: account,
                club_id: club,
                club_name,
                activity_name: activity_name.unwrap_or_else(|| activity.clone()),
                activity_id: activity,
                trainer,
                zone_id: zone,
                zone_name,
                time_from,
                time_to,
                weekdays,
                auto_booking: auto,
            };
            let id = repo.insert(&new_filter).await?;

            let out = FilterActionOutput {
                success: true,
                message: format!(
                    "Filter {} created: {} - {}{}",
                    id,
                    new_filter.club_name,
                    new_filter.activity_name,
                    if auto { " (auto-booking on)" } else { "" }
                ),
                filter_id: Some(id),
            };
            output(&out, json_mode);
        }

        FilterCommands::List { account } => {
            let filters = repo.list_for_account(account).await?;
            let bookings = ctx.bookings();

            let mut views = Vec::with_capacity(filters.len());
            for filter in &filters {
                let active = bookings
                    .count_active_for_filter(filter.account_id, filter.id)
                    .await?;
                views.push(FilterView::new(filter, active));
            }

            let out = FilterListOutput {
                account_id: account,
                total: views.len(),
                filters: views,
            };
            output(&out, json_mode);
        }

        FilterCommands::Remove { id } => {
            let Some(filter) = repo.get(id).await? else {
                bail!("No filter with id {id}");
            };
            repo.remove(id).await?;

            let out = FilterActionOutput {
                success: true,
                message: format!("Filter {} removed ({})", id, filter.label()),
                filter_id: None,
            };
            output(&out, json_mode);
        }

        FilterCommands::Auto { id, enabled } => {
            if repo.get(id).await?.is_none() {
                bail!("No filter with id {id}");
            }
            repo.set_auto_booking(id, enabled).await?;

            let out = FilterActionOutput {
                success: true,
                message: format!(
                    "Filter {} auto-booking {}",
                    id,
                    if enabled { "enabled" } else { "disabled" }
                ),
                filter_id: Some(id),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
