//! Calendar CLI command: an account's booked classes from the portal.

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;

use crate::cli::commands::AppContext;
use crate::cli::{list_table, output, CommandOutput};
use crate::domain::models::BookedSlot;

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Account whose portal calendar to show
    #[arg(long)]
    pub account: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct CalendarEntry {
    pub class_id: i64,
    pub name: String,
    pub start: String,
    pub end: Option<String>,
    pub club: Option<String>,
    pub trainer: Option<String>,
    pub can_cancel: bool,
    pub is_standby: bool,
}

impl From<&BookedSlot> for CalendarEntry {
    fn from(slot: &BookedSlot) -> Self {
        Self {
            class_id: slot.id,
            name: slot.name.clone(),
            start: slot.start.format("%a %Y-%m-%d %H:%M").to_string(),
            end: slot.end.map(|e| e.format("%H:%M").to_string()),
            club: slot.club.clone(),
            trainer: slot.trainer.clone(),
            can_cancel: slot.can_cancel,
            is_standby: slot.is_standby,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CalendarOutput {
    pub account_id: i64,
    pub member_id: i64,
    pub entries: Vec<CalendarEntry>,
    pub total: usize,
}

impl CommandOutput for CalendarOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No booked classes.".to_string();
        }

        let mut table = list_table(&["class", "when", "club", "trainer", "status"]);
        for entry in &self.entries {
            let when = match &entry.end {
                Some(end) => format!("{} - {}", entry.start, end),
                None => entry.start.clone(),
            };
            let status = if entry.is_standby {
                "stand-by"
            } else if entry.can_cancel {
                "booked"
            } else {
                "booked (locked)"
            };
            table.add_row(vec![
                Cell::new(&entry.name),
                Cell::new(when),
                Cell::new(entry.club.as_deref().unwrap_or("-")),
                Cell::new(entry.trainer.as_deref().unwrap_or("-")),
                Cell::new(status),
            ]);
        }
        format!("{} booked class(es):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CalendarArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let (account, session) = ctx.login(args.account).await?;

    let mut booked = session.booked_slots().await?;
    booked.sort_by_key(|slot| slot.start);

    let out = CalendarOutput {
        account_id: account.id,
        member_id: session.member_id(),
        total: booked.len(),
        entries: booked.iter().map(CalendarEntry::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}
