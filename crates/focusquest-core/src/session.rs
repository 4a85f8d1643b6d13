//! Interval session model.
//!
//! An interval session is one timed focus or break period. Sessions are
//! created in the open state and flipped to completed exactly once by the
//! lifecycle manager; a session that is never completed simply stays open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Shortest interval accepted at start.
pub const MIN_DURATION_MINUTES: u32 = 1;
/// Longest interval accepted at start.
pub const MAX_DURATION_MINUTES: u32 = 120;

/// Category of a timed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Focused work period
    Work,
    /// Short rest between work intervals
    Break,
    /// Extended rest after a run of work intervals
    LongBreak,
}

impl SessionKind {
    /// Stable string form, also used as the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::Break => "break",
            SessionKind::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(SessionKind::Work),
            "break" => Ok(SessionKind::Break),
            "long_break" => Ok(SessionKind::LongBreak),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// One focus or break period tracked by the system.
///
/// `account_id` and `task_id` are fixed at creation. `completed`,
/// `points_earned`, and `completed_at` are written once, on completion;
/// `completed_at > started_at` holds whenever it is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalSession {
    pub id: String,
    pub account_id: String,
    /// Optional linked task whose progress advances when a work interval
    /// completes.
    pub task_id: Option<String>,
    pub kind: SessionKind,
    pub duration_minutes: u32,
    pub completed: bool,
    pub points_earned: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
