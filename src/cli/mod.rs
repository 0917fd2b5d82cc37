//! Command-line interface.
//!
//! Clap command structures, the human/JSON output convention, and the
//! top-level error reporter. Each subcommand lives in its own module
//! under [`commands`] with an `execute(args, json_mode)` entry point.

pub mod commands;

use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use commands::account::AccountArgs;
use commands::calendar::CalendarArgs;
use commands::catalog::CatalogArgs;
use commands::check::CheckArgs;
use commands::filter::FilterArgs;
use commands::init::InitArgs;
use commands::run::RunArgs;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(name = "classwatch")]
#[command(about = "Classwatch - class availability monitor and auto-booking", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// All subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize classwatch configuration and database
    Init(InitArgs),

    /// Manage booking portal accounts
    Account(AccountArgs),

    /// Manage class filters
    Filter(FilterArgs),

    /// Browse clubs, activities, and trainers
    Catalog(CatalogArgs),

    /// Show an account's booked classes
    Calendar(CalendarArgs),

    /// Run a single sweep across all accounts
    Check(CheckArgs),

    /// Run the hourly monitoring daemon
    Run(RunArgs),
}

/// Anything a command prints: a human rendering and a JSON rendering.
pub trait CommandOutput: Serialize {
    /// Plain-text form for terminal use.
    fn to_human(&self) -> String;
    /// Structured form for `--json`.
    fn to_json(&self) -> serde_json::Value;
}

/// Print a command result in the mode the user asked for.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Create a borderless list table with uppercased headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Report a top-level command failure and exit non-zero.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_long_string_ellipsized() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_cli_parses_global_json_flag() {
        use clap::Parser;
        let cli = Cli::parse_from(["classwatch", "check", "--json"]);
        assert!(cli.json);
    }
}
