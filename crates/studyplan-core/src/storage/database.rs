//! SQLite-backed local store.
//!
//! Provides persistent storage for:
//! - Key-value pairs (session token, cached user, notepad, cached plan)
//! - Completed timer phases and today's study statistics

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::timer::Phase;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StudyStats {
    pub focus_sessions: u64,
    pub focus_minutes: u64,
    pub break_sessions: u64,
}

impl StudyStats {
    /// Focus time in hours, one decimal place (e.g. "0.4h").
    pub fn focus_hours_label(&self) -> String {
        format!("{:.1}h", self.focus_minutes as f64 / 60.0)
    }
}

/// Local replacement for browser key-value storage.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open the store at `~/.config/studyplan/studyplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studyplan.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests and offline previews).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                phase        TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
        )
    }

    /// Get a value from the kv store.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Record a finished timer phase.
    pub fn record_phase(
        &self,
        phase: Phase,
        duration_min: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        let phase_str = match phase {
            Phase::Focus => "focus",
            Phase::Break => "break",
        };
        self.conn.execute(
            "INSERT INTO sessions (phase, duration_min, completed_at) VALUES (?1, ?2, ?3)",
            params![phase_str, duration_min, completed_at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Statistics for one local calendar day.
    pub fn stats_for(&self, day: NaiveDate) -> Result<StudyStats> {
        self.stats_for_in(day, &Local)
    }

    /// Statistics for `day` as a calendar day in `tz`.
    pub fn stats_for_in<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Result<StudyStats> {
        let next = day.succ_opt().unwrap_or(day);
        self.stats_between(midnight_utc(day, tz), midnight_utc(next, tz))
    }

    /// Statistics for phases completed in `[start, end)`.
    pub fn stats_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<StudyStats> {
        let start = start.to_rfc3339();
        let end = end.to_rfc3339();
        let mut stmt = self.conn.prepare(
            "SELECT phase, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE completed_at >= ?1 AND completed_at < ?2
             GROUP BY phase",
        )?;

        let mut stats = StudyStats::default();
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        for row in rows {
            let (phase, count, minutes) = row?;
            let count = u64::try_from(count).unwrap_or_default();
            let minutes = u64::try_from(minutes).unwrap_or_default();
            match phase.as_str() {
                "focus" => {
                    stats.focus_sessions = count;
                    stats.focus_minutes = minutes;
                }
                "break" => stats.break_sessions = count,
                _ => {}
            }
        }
        Ok(stats)
    }

    pub fn stats_today(&self) -> Result<StudyStats> {
        self.stats_for(Local::now().date_naive())
    }
}

/// Start of `day` in `tz`. A midnight skipped by DST falls back to UTC midnight.
fn midnight_utc<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
