//! Task model and progress state machine.
//!
//! Tasks are the CRUD backend's entity; this core only advances their
//! progress counters when a linked work interval completes. Status moves
//! strictly forward:
//!
//!   PENDING ──(first completed work interval)──> IN_PROGRESS
//!   IN_PROGRESS ──(completed_intervals reaches estimate)──> COMPLETED
//!
//! COMPLETED is terminal. Further linked completions keep incrementing the
//! counter past the estimate without touching status; the overshoot is
//! harmless, not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smallest accepted interval estimate.
pub const MIN_ESTIMATED_INTERVALS: u32 = 1;
/// Largest accepted interval estimate.
pub const MAX_ESTIMATED_INTERVALS: u32 = 20;

/// Task progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No linked interval completed yet
    Pending,
    /// At least one linked interval completed
    InProgress,
    /// Interval estimate reached (terminal)
    Completed,
}

impl TaskStatus {
    /// Stable string form, also used as the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Check if a transition is valid. Status never moves backward.
    pub fn can_transition_to(&self, to: TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => matches!(to, TaskStatus::InProgress | TaskStatus::Completed),
            TaskStatus::InProgress => matches!(to, TaskStatus::Completed),
            TaskStatus::Completed => false,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A task whose progress is measured in completed work intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub estimated_intervals: u32,
    pub completed_intervals: u32,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task with a validated estimate.
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        title: impl Into<String>,
        estimated_intervals: u32,
    ) -> Result<Self, ValidationError> {
        if !(MIN_ESTIMATED_INTERVALS..=MAX_ESTIMATED_INTERVALS).contains(&estimated_intervals) {
            return Err(ValidationError::EstimateOutOfRange {
                min: MIN_ESTIMATED_INTERVALS,
                max: MAX_ESTIMATED_INTERVALS,
                got: estimated_intervals,
            });
        }
        Ok(Self {
            id: id.into(),
            account_id: account_id.into(),
            title: title.into(),
            estimated_intervals,
            completed_intervals: 0,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Record one completed linked work interval.
    ///
    /// Returns the status the task moved to, or `None` when only the
    /// counter changed.
    pub fn record_completed_interval(&mut self) -> Option<TaskStatus> {
        self.completed_intervals += 1;
        if self.completed_intervals >= self.estimated_intervals
            && self.status != TaskStatus::Completed
        {
            self.status = TaskStatus::Completed;
            Some(TaskStatus::Completed)
        } else if self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
            Some(TaskStatus::InProgress)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_bounds_are_enforced() {
        assert!(Task::new("t", "a", "Write report", 0).is_err());
        assert!(Task::new("t", "a", "Write report", 21).is_err());
        assert!(Task::new("t", "a", "Write report", 1).is_ok());
        assert!(Task::new("t", "a", "Write report", 20).is_ok());
    }

    #[test]
    fn first_interval_moves_pending_to_in_progress() {
        let mut task = Task::new("t", "a", "Write report", 3).unwrap();
        let moved = task.record_completed_interval();
        assert_eq!(moved, Some(TaskStatus::InProgress));
        assert_eq!(task.completed_intervals, 1);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn reaching_estimate_completes_the_task() {
        let mut task = Task::new("t", "a", "Write report", 2).unwrap();
        task.record_completed_interval();
        let moved = task.record_completed_interval();
        assert_eq!(moved, Some(TaskStatus::Completed));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn single_interval_estimate_skips_in_progress() {
        let mut task = Task::new("t", "a", "Quick fix", 1).unwrap();
        let moved = task.record_completed_interval();
        assert_eq!(moved, Some(TaskStatus::Completed));
    }

    #[test]
    fn overshoot_increments_without_status_change() {
        let mut task = Task::new("t", "a", "Write report", 1).unwrap();
        task.record_completed_interval();
        assert_eq!(task.status, TaskStatus::Completed);

        let moved = task.record_completed_interval();
        assert_eq!(moved, None);
        assert_eq!(task.completed_intervals, 2);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn status_never_moves_backward() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Completed));
        assert!(!TaskStatus::InProgress.can_transition_to(TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Pending));
    }
}
