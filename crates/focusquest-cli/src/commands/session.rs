//! Interval session commands for CLI.

use clap::Subcommand;
use focusquest_core::storage::{Config, Database};
use focusquest_core::{SessionKind, SessionService};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new interval
    Start {
        /// Account ID
        account_id: String,
        /// Interval kind: work, break, or long_break
        #[arg(long, default_value = "work")]
        kind: String,
        /// Duration in minutes (1-120); defaults from config per kind
        #[arg(long)]
        minutes: Option<u32>,
        /// Linked task ID
        #[arg(long)]
        task: Option<String>,
    },
    /// Complete an open interval and credit its points
    Complete {
        /// Account ID
        account_id: String,
        /// Session ID
        session_id: String,
    },
    /// List an account's sessions
    List {
        /// Account ID
        account_id: String,
        /// Only open (not yet completed) sessions
        #[arg(long)]
        open: bool,
    },
    /// Points an interval would earn, without completing anything
    Preview {
        /// Interval kind: work, break, or long_break
        #[arg(long, default_value = "work")]
        kind: String,
        /// Duration in minutes
        #[arg(long)]
        minutes: u32,
        /// Streak to assume for the multiplier
        #[arg(long, default_value = "0")]
        streak: u32,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Start {
            account_id,
            kind,
            minutes,
            task,
        } => {
            let kind: SessionKind = kind.parse()?;
            let minutes = match minutes {
                Some(m) => m,
                None => Config::load()?.default_minutes(kind),
            };
            let service = SessionService::new(Database::open()?);
            let session = service.start_interval(&account_id, kind, minutes, task.as_deref())?;
            println!("Session started: {}", session.id);
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::Complete {
            account_id,
            session_id,
        } => {
            let mut service = SessionService::new(Database::open()?);
            let outcome = service.complete_interval(&session_id, &account_id)?;
            println!(
                "Session completed: +{} points (level {}, {} points, streak {})",
                outcome.session.points_earned,
                outcome.account.level,
                outcome.account.points,
                outcome.account.streak,
            );
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        SessionAction::List { account_id, open } => {
            let db = Database::open()?;
            let sessions: Vec<_> = db
                .list_sessions(&account_id)?
                .into_iter()
                .filter(|s| !open || !s.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionAction::Preview {
            kind,
            minutes,
            streak,
        } => {
            let kind: SessionKind = kind.parse()?;
            let points = SessionService::preview_points(minutes, kind, streak);
            println!("{points}");
        }
    }
    Ok(())
}
