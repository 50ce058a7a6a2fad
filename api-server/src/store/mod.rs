mod db;
#[cfg(test)]
mod tests;

use std::{
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use ecocity_snake_core::StoreError;
use rusqlite::{params, Connection, OptionalExtension};

use crate::ProfileRecord;

/// SQLite-backed Profile Store and Leaderboard Store.
///
/// One `profiles` row and at most one `leaderboard` row per user. Every write
/// is a single-row upsert; nothing here spans documents.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) `{data_dir}/ecocity.db` and make sure the schema exists.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("ecocity.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id               TEXT PRIMARY KEY,
                last_run_score        INTEGER NOT NULL,
                last_run_timestamp_ms INTEGER NOT NULL,
                highest_score         INTEGER,
                updated_at_ms         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS leaderboard (
                user_id        TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                photo_url      TEXT,
                highest_score  INTEGER NOT NULL,
                updated_at_ms  INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_leaderboard_score
                ON leaderboard(highest_score DESC);",
        )
        .map_err(|e| format!("failed to create schema: {e}"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection mutex poisoned".to_string()))
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        let row = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT user_id, last_run_score, last_run_timestamp_ms, highest_score,
                        updated_at_ms
                 FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(RawProfileRow {
                        user_id: row.get(0)?,
                        last_run_score: row.get(1)?,
                        last_run_timestamp_ms: row.get(2)?,
                        highest_score: row.get(3)?,
                        updated_at_ms: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(|e| backend("get_profile", e))?
        };

        row.map(RawProfileRow::into_record).transpose()
    }

    /// Returns (profiles, leaderboard rows).
    pub fn counts(&self) -> Result<(usize, usize), StoreError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT (SELECT COUNT(*) FROM profiles), (SELECT COUNT(*) FROM leaderboard)",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                ))
            },
        )
        .map_err(|e| backend("counts", e))
    }
}

struct RawProfileRow {
    user_id: String,
    last_run_score: i64,
    last_run_timestamp_ms: i64,
    highest_score: Option<i64>,
    updated_at_ms: i64,
}

impl RawProfileRow {
    fn into_record(self) -> Result<ProfileRecord, StoreError> {
        Ok(ProfileRecord {
            user_id: self.user_id,
            last_run_score: score_from_db("last_run_score", self.last_run_score)?,
            last_run_timestamp_ms: self.last_run_timestamp_ms.max(0) as u64,
            highest_score: self
                .highest_score
                .map(|value| score_from_db("highest_score", value))
                .transpose()?,
            updated_at_ms: self.updated_at_ms.max(0) as u64,
        })
    }
}

pub(crate) fn backend(context: &str, err: rusqlite::Error) -> StoreError {
    StoreError::Backend(format!("{context} failed: {err}"))
}

pub(crate) fn score_from_db(field: &'static str, value: i64) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt {
        field,
        detail: format!("{value} is not a valid score"),
    })
}
