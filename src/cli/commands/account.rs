//! Account CLI commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::commands::AppContext;
use crate::cli::{list_table, output, CommandOutput};
use crate::domain::models::Account;
use crate::domain::ports::AccountRepository;

#[derive(Args, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommands,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Register a portal account
    Add {
        /// Operator-assigned id; also the Telegram chat notified for
        /// this account
        id: i64,
        /// Portal login email
        email: String,
        /// Portal password
        password: String,
    },
    /// List registered accounts
    List,
    /// Remove an account, its filters, bookings, and notification marks
    Remove {
        /// Account id
        id: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct AccountView {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            created_at: account.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AccountListOutput {
    pub accounts: Vec<AccountView>,
    pub total: usize,
}

impl CommandOutput for AccountListOutput {
    fn to_human(&self) -> String {
        if self.accounts.is_empty() {
            return "No accounts registered.".to_string();
        }

        let mut table = list_table(&["id", "email", "registered"]);
        for account in &self.accounts {
            table.add_row(vec![
                Cell::new(account.id),
                Cell::new(&account.email),
                Cell::new(&account.created_at),
            ]);
        }
        format!("{} account(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AccountActionOutput {
    pub success: bool,
    pub message: String,
    pub account: Option<AccountView>,
}

impl CommandOutput for AccountActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AccountArgs, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open().await?;
    let repo = ctx.accounts();

    match args.command {
        AccountCommands::Add { id, email, password } => {
            if repo.get(id).await?.is_some() {
                bail!("Account {id} already exists");
            }
            if repo.get_by_email(&email).await?.is_some() {
                bail!("An account with email {email} already exists");
            }

            let account = Account::new(id, email, password);
            repo.insert(&account).await?;

            let out = AccountActionOutput {
                success: true,
                message: format!("Account {} registered ({})", account.id, account.email),
                account: Some(AccountView::from(&account)),
            };
            output(&out, json_mode);
        }

        AccountCommands::List => {
            let accounts = repo.list().await?;
            let out = AccountListOutput {
                total: accounts.len(),
                accounts: accounts.iter().map(AccountView::from).collect(),
            };
            output(&out, json_mode);
        }

        AccountCommands::Remove { id } => {
            let Some(account) = repo.get(id).await? else {
                bail!("No account with id {id}");
            };
            repo.remove(id).await?;

            let out = AccountActionOutput {
                success: true,
                message: format!("Account {} removed ({})", id, account.email),
                account: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
