//! Change history for a credentials file, kept in SQLite.
//!
//! Off unless `history_file` is set in `.mqttcred.toml`.  Only changes the
//! store has already committed are recorded: who was added (and at what
//! PBKDF2 cost) and who was removed (and how many users were left).
//! Passwords and hash tokens never reach the database.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};

use crate::errors::{MqttCredError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS credential_changes (
    id               INTEGER PRIMARY KEY,
    changed_at       INTEGER NOT NULL,
    kind             TEXT    NOT NULL,
    username         TEXT    NOT NULL,
    credentials_file TEXT    NOT NULL,
    rounds           INTEGER,
    remaining        INTEGER
);
CREATE INDEX IF NOT EXISTS credential_changes_by_user
    ON credential_changes (username, changed_at);
";

/// What happened to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

impl ToSql for ChangeKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ChangeKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "added" => Ok(Self::Added),
            "removed" => Ok(Self::Removed),
            other => Err(FromSqlError::Other(
                format!("unknown change kind '{other}'").into(),
            )),
        }
    }
}

/// One committed change to a credentials file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub at: DateTime<Utc>,
    pub kind: ChangeKind,
    pub username: String,
    pub credentials_file: PathBuf,
    /// PBKDF2 rounds of the new hash (additions only).
    pub rounds: Option<u32>,
    /// Users left in the file (removals only).
    pub remaining: Option<usize>,
}

impl Change {
    /// A user was appended, hashed with `rounds` iterations.
    pub fn added(credentials_file: &Path, username: &str, rounds: u32) -> Self {
        Self {
            at: Utc::now(),
            kind: ChangeKind::Added,
            username: username.to_string(),
            credentials_file: credentials_file.to_path_buf(),
            rounds: Some(rounds),
            remaining: None,
        }
    }

    /// A user was removed, leaving `remaining` records.
    pub fn removed(credentials_file: &Path, username: &str, remaining: usize) -> Self {
        Self {
            at: Utc::now(),
            kind: ChangeKind::Removed,
            username: username.to_string(),
            credentials_file: credentials_file.to_path_buf(),
            rounds: None,
            remaining: Some(remaining),
        }
    }
}

/// Which changes to return from [`History::changes`].
#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    pub username: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: usize,
}

/// Handle to the history database.
pub struct History {
    conn: Connection,
}

impl History {
    /// Open the database at `path`, creating it (owner-only on Unix) if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            MqttCredError::HistoryError(format!("cannot open {}: {e}", path.display()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        conn.execute_batch(SCHEMA)
            .map_err(|e| MqttCredError::HistoryError(format!("schema: {e}")))?;

        Ok(Self { conn })
    }

    pub fn record(&self, change: &Change) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO credential_changes
                     (changed_at, kind, username, credentials_file, rounds, remaining)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    change.at.timestamp(),
                    change.kind,
                    change.username,
                    change.credentials_file.to_string_lossy().into_owned(),
                    change.rounds,
                    change.remaining.and_then(|n| i64::try_from(n).ok()),
                ],
            )
            .map_err(|e| MqttCredError::HistoryError(format!("insert: {e}")))?;
        Ok(())
    }

    /// Matching changes, newest first.
    pub fn changes(&self, filter: &ChangeFilter) -> Result<Vec<Change>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT changed_at, kind, username, credentials_file, rounds, remaining
                 FROM credential_changes
                 WHERE (?1 IS NULL OR username = ?1)
                   AND (?2 IS NULL OR changed_at >= ?2)
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| MqttCredError::HistoryError(format!("prepare: {e}")))?;

        let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
        let since = filter.since.map(|t| t.timestamp());

        let rows = stmt
            .query_map(params![filter.username, since, limit], |row| {
                let secs: i64 = row.get(0)?;
                let at = DateTime::from_timestamp(secs, 0)
                    .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, secs))?;
                let file: String = row.get(3)?;
                let remaining: Option<i64> = row.get(5)?;

                Ok(Change {
                    at,
                    kind: row.get(1)?,
                    username: row.get(2)?,
                    credentials_file: PathBuf::from(file),
                    rounds: row.get(4)?,
                    remaining: remaining.and_then(|n| usize::try_from(n).ok()),
                })
            })
            .map_err(|e| MqttCredError::HistoryError(format!("query: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| MqttCredError::HistoryError(format!("row: {e}")))
    }
}
