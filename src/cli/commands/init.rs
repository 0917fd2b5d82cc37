//! Implementation of the `classwatch init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::{output, CommandOutput};
use crate::infrastructure::config::ConfigLoader;

/// Starter configuration written by `init`. Every value shown is the
/// built-in default; `CLASSWATCH_*` environment variables override both.
const CONFIG_TEMPLATE: &str = r#"# Classwatch configuration.
#
# Values here override the built-in defaults. Put machine-local secrets
# in local.yaml next to this file, or in the environment
# (CLASSWATCH_TELEGRAM__BOT_TOKEN and friends).

database:
  path: .classwatch/classwatch.db

logging:
  level: info
  # Uncomment for daily-rolling JSON log files in addition to stderr:
  # dir: .classwatch/logs

booking_service:
  base_url: https://zdrofit.perfectgym.pl
  # How far ahead each sweep looks, in hours.
  search_window_hours: 48
  auth_max_retries: 3
  auth_backoff_base_secs: 2
  request_timeout_secs: 30

telegram:
  # Bot token from @BotFather. Required by `check` and `run`.
  bot_token: ""

monitor:
  # Hard ceiling on one sweep across all accounts.
  per_run_timeout_secs: 300
  # Where to poll for accounts that have no filters yet.
  default_club_id: 7
  default_club_name: Zdrofit Bemowo Dywizjonu 303
  default_activity_id: "20"
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        if !self.success {
            return self.message.clone();
        }
        format!(
            "{}\n\nConfig:   {}\nDatabase: {}\n\nNext steps:\n  \
             1. Put your Telegram bot token in the config.\n  \
             2. classwatch account add <chat-id> <email> <password>\n  \
             3. classwatch filter add --account <chat-id> --club <id> --activity <id>\n  \
             4. classwatch run",
            self.message,
            self.config_path.display(),
            self.database_path.display()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let classwatch_dir = target_path.join(".classwatch");
    let config_path = classwatch_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Already initialized. Use --force to overwrite the configuration."
                .to_string(),
            config_path,
            database_path: classwatch_dir.join("classwatch.db"),
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    fs::create_dir_all(&classwatch_dir)
        .await
        .with_context(|| format!("Failed to create {}", classwatch_dir.display()))?;

    fs::write(&config_path, CONFIG_TEMPLATE)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    // Round-trip the template through the loader so a template/schema
    // mismatch fails here and not on the first sweep.
    let config = ConfigLoader::load_from_file(&config_path)?;

    let database_path = {
        let configured = PathBuf::from(&config.database.path);
        if configured.is_absolute() {
            configured
        } else {
            target_path.join(configured)
        }
    };
    let pool = initialize_database(&database_path.to_string_lossy())
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Reinitialized.".to_string()
        } else {
            "Initialized.".to_string()
        },
        config_path,
        database_path,
    };
    output(&output_data, json_mode);
    Ok(())
}
