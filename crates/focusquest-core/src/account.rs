//! Account progress aggregate.
//!
//! The mutable gamification state attached to an account. Outside of
//! registration it is mutated exclusively by the session lifecycle
//! manager, which keeps `level == level_for_points(points)` after every
//! mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring;

/// An account and its cumulative gamification state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Cumulative points; never decreases in normal operation.
    pub points: i64,
    /// Derived from `points`, persisted for read efficiency.
    pub level: u32,
    /// Consecutive qualifying days with at least one completed interval.
    pub streak: u32,
    pub created_at: DateTime<Utc>,
}

/// The minimal triple a caller needs to refresh a user-facing summary
/// after completing an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProgress {
    pub level: u32,
    pub points: i64,
    pub streak: u32,
}

impl Account {
    /// Fresh account at registration: zero points, level 1, no streak.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points: 0,
            level: 1,
            streak: 0,
            created_at: Utc::now(),
        }
    }

    /// Fold one completed interval into the aggregate.
    ///
    /// `streak_continued` reflects the continuity check against the
    /// previous completed session; false covers both a broken streak and
    /// the first-ever completion, which both restart the count at 1. The
    /// level is rederived from the new point total so the aggregate
    /// invariant holds after the mutation.
    pub fn apply_completion(&mut self, points: i64, streak_continued: bool) {
        self.points += points;
        self.streak = if streak_continued { self.streak + 1 } else { 1 };
        self.level = scoring::level_for_points(self.points);
    }

    /// Summary triple for callers.
    pub fn progress(&self) -> AccountProgress {
        AccountProgress {
            level: self.level,
            points: self.points,
            streak: self.streak,
        }
    }

    /// Position within the current level, 0..=100.
    pub fn progress_percent(&self) -> u8 {
        scoring::level_progress_percent(self.points, self.level)
    }
}
