//! Session statistics commands for CLI.

use clap::Subcommand;
use focusquest_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today {
        /// Account ID
        account_id: String,
    },
    /// All-time stats
    All {
        /// Account ID
        account_id: String,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today { account_id } => {
            let totals = db.stats_today(&account_id)?;
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
        StatsAction::All { account_id } => {
            let totals = db.stats_all(&account_id)?;
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
    }
    Ok(())
}
