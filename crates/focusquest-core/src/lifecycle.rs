//! Session lifecycle manager.
//!
//! Owns the open -> completed transition of interval sessions and the
//! resulting updates to the owning account and any linked task. Starting
//! an interval mutates nothing beyond the new session row, so abandoned
//! sessions cost nothing. Completion flips the session and updates the
//! account in one storage transaction; the linked-task progress update
//! runs afterwards, best-effort.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountProgress;
use crate::error::{CoreError, SessionError, ValidationError};
use crate::scoring;
use crate::session::{IntervalSession, SessionKind, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::storage::Database;

/// Result of completing an interval: the completed session plus the
/// account's refreshed summary triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub session: IntervalSession,
    pub account: AccountProgress,
}

/// Coordinates session state transitions against the storage collaborator.
///
/// Callers are expected to arrive with an already-authenticated account id;
/// the service verifies ownership of the records it touches but performs no
/// authentication of its own.
pub struct SessionService {
    db: Database,
}

impl SessionService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Read access to the underlying storage, for callers that only list
    /// or display records.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Open a new interval in the given account.
    ///
    /// Duration must lie in [1, 120] minutes. A linked task must exist and
    /// belong to the account; ownership failures surface as
    /// [`SessionError::TaskNotFound`]. No account or task state changes
    /// here; points, streak, and task progress are applied only on
    /// completion.
    pub fn start_interval(
        &self,
        account_id: &str,
        kind: SessionKind,
        duration_minutes: u32,
        task_id: Option<&str>,
    ) -> Result<IntervalSession, CoreError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(ValidationError::DurationOutOfRange {
                min: MIN_DURATION_MINUTES,
                max: MAX_DURATION_MINUTES,
                got: duration_minutes,
            }
            .into());
        }
        if self.db.find_account(account_id)?.is_none() {
            return Err(SessionError::AccountNotFound(account_id.to_string()).into());
        }
        if let Some(task_id) = task_id {
            match self.db.find_task(task_id)? {
                Some(task) if task.account_id == account_id => {}
                _ => return Err(SessionError::TaskNotFound(task_id.to_string()).into()),
            }
        }

        let session = IntervalSession {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            task_id: task_id.map(str::to_string),
            kind,
            duration_minutes,
            completed: false,
            points_earned: 0,
            started_at: Utc::now(),
            completed_at: None,
        };
        self.db.create_session(&session)?;
        Ok(session)
    }

    /// Complete an open interval and credit its points.
    ///
    /// The session must exist, belong to `account_id`, and still be open.
    /// The session flip and the account update commit together; the flip
    /// is conditional on the session still being open at the point of
    /// update, so a concurrent retry that lost the race gets
    /// [`SessionError::AlreadyCompleted`] and credits nothing.
    pub fn complete_interval(
        &mut self,
        session_id: &str,
        account_id: &str,
    ) -> Result<CompletionOutcome, CoreError> {
        let mut session = match self.db.find_session(session_id)? {
            Some(s) if s.account_id == account_id => s,
            _ => return Err(SessionError::SessionNotFound(session_id.to_string()).into()),
        };
        if session.completed {
            return Err(SessionError::AlreadyCompleted(session_id.to_string()).into());
        }
        let mut account = self
            .db
            .find_account(account_id)?
            .ok_or_else(|| SessionError::AccountNotFound(account_id.to_string()))?;

        let now = Utc::now();
        // Points use the streak value as it stood before this completion.
        let points = scoring::interval_points(session.duration_minutes, session.kind, account.streak);

        // The previous completed session is read before this one's
        // completion commits, so the session being completed can never be
        // mistaken for its own predecessor.
        let continued = match self
            .db
            .find_latest_completed_session(account_id, session_id)?
        {
            Some(prev) => {
                let anchor = prev.completed_at.unwrap_or(prev.started_at);
                scoring::streak_continues(anchor, now)
            }
            None => false,
        };
        account.apply_completion(points, continued);

        if !self
            .db
            .complete_session_with_account(session_id, now, points, &account)?
        {
            // A concurrent completion won the race; the account row was
            // left untouched by the rolled-back transaction.
            return Err(SessionError::AlreadyCompleted(session_id.to_string()).into());
        }

        session.completed = true;
        session.completed_at = Some(now);
        session.points_earned = points;

        if session.kind == SessionKind::Work {
            if let Some(task_id) = session.task_id.as_deref() {
                self.update_linked_task(task_id);
            }
        }

        Ok(CompletionOutcome {
            account: account.progress(),
            session,
        })
    }

    /// Points an interval would earn, for display before completing.
    pub fn preview_points(duration_minutes: u32, kind: SessionKind, streak: u32) -> i64 {
        scoring::interval_points(duration_minutes, kind, streak)
    }

    /// The session and account updates are already committed when this
    /// runs, so storage failures here are logged and swallowed rather than
    /// failing the completion.
    fn update_linked_task(&self, task_id: &str) {
        if let Err(e) = self.try_update_linked_task(task_id) {
            log::warn!("task progress update failed for {task_id}: {e}");
        }
    }

    fn try_update_linked_task(&self, task_id: &str) -> Result<(), CoreError> {
        let Some(mut task) = self.db.find_task(task_id)? else {
            // Task deleted between session start and completion: skip.
            return Ok(());
        };
        if let Some(status) = task.record_completed_interval() {
            log::info!("task {task_id} moved to {}", status.as_str());
        }
        self.db.save_task_progress(&task)?;
        Ok(())
    }
}
