use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusquest", version, about = "Focusquest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account registration and progress
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Interval session lifecycle
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Completed session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Account { action } => commands::account::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
