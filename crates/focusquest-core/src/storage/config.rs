//! TOML-based application configuration.
//!
//! Stores the default interval duration per session kind, used by callers
//! that start an interval without an explicit duration.
//!
//! Configuration is stored at `~/.config/focusquest/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::session::SessionKind;

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

/// Default interval durations, in minutes, per session kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusquest/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationsConfig,
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first use.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Default duration for intervals of the given kind.
    pub fn default_minutes(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.durations.work_minutes,
            SessionKind::Break => self.durations.break_minutes,
            SessionKind::LongBreak => self.durations.long_break_minutes,
        }
    }
}
