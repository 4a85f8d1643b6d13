//! Configuration management commands for CLI.

use clap::Subcommand;
use focusquest_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set default interval durations
    Set {
        /// Default work interval minutes
        #[arg(long)]
        work: Option<u32>,
        /// Default break minutes
        #[arg(long = "break")]
        break_minutes: Option<u32>,
        /// Default long break minutes
        #[arg(long)]
        long_break: Option<u32>,
    },
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            work,
            break_minutes,
            long_break,
        } => {
            let mut config = Config::load()?;
            if let Some(minutes) = work {
                config.durations.work_minutes = minutes;
            }
            if let Some(minutes) = break_minutes {
                config.durations.break_minutes = minutes;
            }
            if let Some(minutes) = long_break {
                config.durations.long_break_minutes = minutes;
            }
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
