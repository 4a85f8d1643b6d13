//! Storage layer: SQLite persistence and TOML configuration.

mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, SessionTotals};

use std::path::PathBuf;

/// Returns `~/.config/focusquest[-dev]/` based on FOCUSQUEST_ENV.
///
/// Set FOCUSQUEST_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSQUEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusquest-dev")
    } else {
        base_dir.join("focusquest")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
