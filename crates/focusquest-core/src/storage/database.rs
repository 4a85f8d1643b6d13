//! SQLite-based storage for accounts, interval sessions, and tasks.
//!
//! Provides the persistence operations the lifecycle manager consumes:
//! narrow find/create calls per record plus one transactional operation
//! that flips a session to completed and saves the owning account
//! together. Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::error::{CoreError, DatabaseError};
use crate::session::{IntervalSession, SessionKind};
use crate::task::{Task, TaskStatus};

use super::data_dir;

// === Helper Functions ===

/// Parse session kind from database string
fn parse_kind(kind_str: &str) -> SessionKind {
    match kind_str {
        "break" => SessionKind::Break,
        "long_break" => SessionKind::LongBreak,
        _ => SessionKind::Work,
    }
}

/// Parse task status from database string
fn parse_status(status_str: &str) -> TaskStatus {
    match status_str {
        "in_progress" => TaskStatus::InProgress,
        "completed" => TaskStatus::Completed,
        _ => TaskStatus::Pending,
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build an IntervalSession from a database row.
///
/// Expects the column order of `SESSION_COLUMNS`.
fn row_to_session(row: &rusqlite::Row) -> Result<IntervalSession, rusqlite::Error> {
    let kind_str: String = row.get(3)?;
    let started_at_str: String = row.get(7)?;
    let completed_at_str: Option<String> = row.get(8)?;

    Ok(IntervalSession {
        id: row.get(0)?,
        account_id: row.get(1)?,
        task_id: row.get(2)?,
        kind: parse_kind(&kind_str),
        duration_minutes: row.get(4)?,
        completed: row.get(5)?,
        points_earned: row.get(6)?,
        started_at: parse_datetime_fallback(&started_at_str),
        completed_at: completed_at_str.map(|s| parse_datetime_fallback(&s)),
    })
}

/// Build a Task from a database row.
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Task {
        id: row.get(0)?,
        account_id: row.get(1)?,
        title: row.get(2)?,
        estimated_intervals: row.get(3)?,
        completed_intervals: row.get(4)?,
        status: parse_status(&status_str),
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

const SESSION_COLUMNS: &str =
    "id, account_id, task_id, kind, duration_minutes, completed, points_earned, started_at, completed_at";

const TASK_COLUMNS: &str =
    "id, account_id, title, estimated_intervals, completed_intervals, status, created_at";

/// Aggregate over an account's completed sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionTotals {
    pub total_sessions: u64,
    pub work_sessions: u64,
    pub work_minutes: u64,
    pub break_minutes: u64,
    pub points_earned: i64,
}

/// SQLite database for accounts, sessions, and tasks.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusquest/focusquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("focusquest.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral use).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS accounts (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    points      INTEGER NOT NULL DEFAULT 0,
                    level       INTEGER NOT NULL DEFAULT 1,
                    streak      INTEGER NOT NULL DEFAULT 0,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS sessions (
                    id               TEXT PRIMARY KEY,
                    account_id       TEXT NOT NULL,
                    task_id          TEXT,
                    kind             TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    completed        INTEGER NOT NULL DEFAULT 0,
                    points_earned    INTEGER NOT NULL DEFAULT 0,
                    started_at       TEXT NOT NULL,
                    completed_at     TEXT
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id                  TEXT PRIMARY KEY,
                    account_id          TEXT NOT NULL,
                    title               TEXT NOT NULL,
                    estimated_intervals INTEGER NOT NULL,
                    completed_intervals INTEGER NOT NULL DEFAULT 0,
                    status              TEXT NOT NULL DEFAULT 'pending',
                    created_at          TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_account_completed
                    ON sessions(account_id, completed, completed_at);
                CREATE INDEX IF NOT EXISTS idx_tasks_account ON tasks(account_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // === Accounts ===

    pub fn create_account(&self, account: &Account) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO accounts (id, name, points, level, streak, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.id,
                account.name,
                account.points,
                account.level,
                account.streak,
                account.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn find_account(&self, id: &str) -> Result<Option<Account>, DatabaseError> {
        let account = self
            .conn
            .query_row(
                "SELECT id, name, points, level, streak, created_at FROM accounts WHERE id = ?1",
                params![id],
                |row| {
                    let created_at_str: String = row.get(5)?;
                    Ok(Account {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        points: row.get(2)?,
                        level: row.get(3)?,
                        streak: row.get(4)?,
                        created_at: parse_datetime_fallback(&created_at_str),
                    })
                },
            )
            .optional()?;
        Ok(account)
    }

    // === Sessions ===

    pub fn create_session(&self, session: &IntervalSession) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, account_id, task_id, kind, duration_minutes,
                                   completed, points_earned, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session.id,
                session.account_id,
                session.task_id,
                session.kind.as_str(),
                session.duration_minutes,
                session.completed,
                session.points_earned,
                session.started_at.to_rfc3339(),
                session.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    pub fn find_session(&self, id: &str) -> Result<Option<IntervalSession>, DatabaseError> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
        let session = self
            .conn
            .query_row(&sql, params![id], row_to_session)
            .optional()?;
        Ok(session)
    }

    /// All of an account's sessions, most recently started first.
    pub fn list_sessions(&self, account_id: &str) -> Result<Vec<IntervalSession>, DatabaseError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE account_id = ?1 ORDER BY started_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![account_id], row_to_session)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// The account's most recently completed session, excluding the given
    /// one. Used for the streak continuity check, which must not see the
    /// session currently being completed.
    pub fn find_latest_completed_session(
        &self,
        account_id: &str,
        excluding_session_id: &str,
    ) -> Result<Option<IntervalSession>, DatabaseError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE account_id = ?1 AND completed = 1 AND id <> ?2
             ORDER BY completed_at DESC LIMIT 1"
        );
        let session = self
            .conn
            .query_row(&sql, params![account_id, excluding_session_id], row_to_session)
            .optional()?;
        Ok(session)
    }

    /// Flip a session to completed and save the account, atomically.
    ///
    /// The session update is conditional on `completed = 0`, so two
    /// overlapping completions of the same session cannot both credit
    /// points: the loser sees zero rows updated, the transaction rolls
    /// back, and `Ok(false)` is returned with the account untouched.
    pub fn complete_session_with_account(
        &mut self,
        session_id: &str,
        completed_at: DateTime<Utc>,
        points_earned: i64,
        account: &Account,
    ) -> Result<bool, DatabaseError> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE sessions SET completed = 1, completed_at = ?1, points_earned = ?2
             WHERE id = ?3 AND completed = 0",
            params![completed_at.to_rfc3339(), points_earned, session_id],
        )?;
        if updated == 0 {
            tx.rollback()?;
            return Ok(false);
        }

        tx.execute(
            "UPDATE accounts SET points = ?1, level = ?2, streak = ?3 WHERE id = ?4",
            params![account.points, account.level, account.streak, account.id],
        )?;

        tx.commit()?;
        Ok(true)
    }

    // === Tasks ===

    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (id, account_id, title, estimated_intervals,
                                completed_intervals, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.account_id,
                task.title,
                task.estimated_intervals,
                task.completed_intervals,
                task.status.as_str(),
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn find_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self
            .conn
            .query_row(&sql, params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    pub fn list_tasks(&self, account_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE account_id = ?1 ORDER BY created_at"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![account_id], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Persist a task's progress counters and status.
    pub fn save_task_progress(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE tasks SET completed_intervals = ?1, status = ?2 WHERE id = ?3",
            params![task.completed_intervals, task.status.as_str(), task.id],
        )?;
        Ok(())
    }

    /// Delete a task. Returns whether a row was removed. Sessions keep
    /// their `task_id` reference; completion treats a dangling reference
    /// as a silent skip.
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // === Statistics ===

    /// All-time totals over an account's completed sessions.
    pub fn stats_all(&self, account_id: &str) -> Result<SessionTotals, DatabaseError> {
        self.totals_where(account_id, None)
    }

    /// Today's totals over an account's completed sessions.
    pub fn stats_today(&self, account_id: &str) -> Result<SessionTotals, DatabaseError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.totals_where(account_id, Some(format!("{today}T00:00:00+00:00")))
    }

    fn totals_where(
        &self,
        account_id: &str,
        completed_since: Option<String>,
    ) -> Result<SessionTotals, DatabaseError> {
        let sql = format!(
            "SELECT kind, COUNT(*), COALESCE(SUM(duration_minutes), 0), COALESCE(SUM(points_earned), 0)
             FROM sessions
             WHERE account_id = ?1 AND completed = 1 {}
             GROUP BY kind",
            if completed_since.is_some() {
                "AND completed_at >= ?2"
            } else {
                ""
            }
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let map_row = |row: &rusqlite::Row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        };
        let rows = match &completed_since {
            Some(since) => stmt.query_map(params![account_id, since], map_row)?,
            None => stmt.query_map(params![account_id], map_row)?,
        };

        let mut totals = SessionTotals::default();
        for row in rows {
            let (kind, count, minutes, points) = row?;
            totals.total_sessions += count;
            totals.points_earned += points;
            match kind.as_str() {
                "work" => {
                    totals.work_sessions += count;
                    totals.work_minutes += minutes;
                }
                "break" | "long_break" => {
                    totals.break_minutes += minutes;
                }
                _ => {}
            }
        }
        Ok(totals)
    }
}
