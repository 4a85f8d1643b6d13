//! Account management commands for CLI.

use clap::Subcommand;
use focusquest_core::scoring;
use focusquest_core::storage::Database;
use focusquest_core::Account;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Register a new account
    Create {
        /// Display name
        name: String,
    },
    /// Show an account's gamification summary
    Show {
        /// Account ID
        id: String,
    },
}

pub fn run(action: AccountAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        AccountAction::Create { name } => {
            let account = Account::new(Uuid::new_v4().to_string(), name);
            db.create_account(&account)?;
            println!("Account created: {}", account.id);
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
        AccountAction::Show { id } => {
            let account = db
                .find_account(&id)?
                .ok_or_else(|| format!("account not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&account)?);
            println!(
                "Level {} ({}% to level {}), next level at {} points, streak {} days",
                account.level,
                account.progress_percent(),
                account.level + 1,
                scoring::points_threshold_for_level(account.level),
                account.streak,
            );
        }
    }
    Ok(())
}
