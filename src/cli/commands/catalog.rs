//! Catalog CLI commands: clubs, activities, trainers.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::commands::AppContext;
use crate::cli::{list_table, output, CommandOutput};
use crate::domain::models::{Activity, Club, Trainer, CLUBS};

#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List known clubs (built-in catalog, no portal access)
    Clubs {
        /// Only clubs whose city contains this text
        #[arg(long)]
        city: Option<String>,
    },
    /// List a club's activities from the portal
    Activities {
        /// Account whose credentials to use
        #[arg(long)]
        account: i64,
        /// Club id
        #[arg(long)]
        club: i64,
    },
    /// List trainers for an activity at a club
    Trainers {
        /// Account whose credentials to use
        #[arg(long)]
        account: i64,
        /// Club id
        #[arg(long)]
        club: i64,
        /// Activity/timetable id
        #[arg(long)]
        activity: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ClubView {
    pub id: i64,
    pub name: String,
    pub city: String,
}

impl From<&Club> for ClubView {
    fn from(club: &Club) -> Self {
        Self {
            id: club.id,
            name: club.name.to_string(),
            city: club.city.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ClubListOutput {
    pub clubs: Vec<ClubView>,
    pub total: usize,
}

impl CommandOutput for ClubListOutput {
    fn to_human(&self) -> String {
        if self.clubs.is_empty() {
            return "No clubs match.".to_string();
        }
        let mut table = list_table(&["id", "name", "city"]);
        for club in &self.clubs {
            table.add_row(vec![
                Cell::new(club.id),
                Cell::new(&club.name),
                Cell::new(&club.city),
            ]);
        }
        format!("{} club(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ActivityListOutput {
    pub club_id: i64,
    pub activities: Vec<Activity>,
    pub total: usize,
}

impl CommandOutput for ActivityListOutput {
    fn to_human(&self) -> String {
        if self.activities.is_empty() {
            return format!("No activities listed for club {}.", self.club_id);
        }
        let mut table = list_table(&["id", "name"]);
        for activity in &self.activities {
            table.add_row(vec![Cell::new(&activity.id), Cell::new(&activity.name)]);
        }
        format!("{} activities at club {}:\n{table}", self.total, self.club_id)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TrainerListOutput {
    pub club_id: i64,
    pub activity_id: String,
    pub trainers: Vec<Trainer>,
    pub total: usize,
}

impl CommandOutput for TrainerListOutput {
    fn to_human(&self) -> String {
        if self.trainers.is_empty() {
            return format!(
                "No trainers found for activity {} at club {}.",
                self.activity_id, self.club_id
            );
        }
        let mut lines = vec![format!(
            "{} trainer(s) for activity {} at club {}:",
            self.total, self.activity_id, self.club_id
        )];
        for trainer in &self.trainers {
            lines.push(format!("  - {}", trainer.name));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CatalogArgs, json_mode: bool) -> Result<()> {
    match args.command {
        CatalogCommands::Clubs { city } => {
            let needle = city.map(|c| c.to_lowercase());
            let clubs: Vec<ClubView> = CLUBS
                .iter()
                .filter(|club| {
                    needle
                        .as_deref()
                        .is_none_or(|n| club.city.to_lowercase().contains(n))
                })
                .map(ClubView::from)
                .collect();
            let out = ClubListOutput {
                total: clubs.len(),
                clubs,
            };
            output(&out, json_mode);
        }

        CatalogCommands::Activities { account, club } => {
            let ctx = AppContext::open().await?;
            let (_, session) = ctx.login(account).await?;
            let activities = session.activities(club).await?;
            let out = ActivityListOutput {
                club_id: club,
                total: activities.len(),
                activities,
            };
            output(&out, json_mode);
        }

        CatalogCommands::Trainers { account, club, activity } => {
            let ctx = AppContext::open().await?;
            let (_, session) = ctx.login(account).await?;
            let trainers = session.trainers(club, &activity).await?;
            let out = TrainerListOutput {
                club_id: club,
                activity_id: activity,
                total: trainers.len(),
                trainers,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
