use ecocity_snake_core::{
    LeaderboardEntry, LeaderboardStore, ProfileStore, ProfileUpdate, StoreError,
};
use rusqlite::{params, OptionalExtension};

use super::{backend, score_from_db, SqliteStore};
use crate::now_unix_ms;

impl ProfileStore for SqliteStore {
    /// Merge-upsert: a `None` highest score keeps whatever is stored, and a
    /// stored best is never lowered.
    fn merge_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO profiles (
                user_id, last_run_score, last_run_timestamp_ms, highest_score, updated_at_ms
             ) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                last_run_score = excluded.last_run_score,
                last_run_timestamp_ms = excluded.last_run_timestamp_ms,
                highest_score = CASE
                    WHEN excluded.highest_score IS NULL THEN profiles.highest_score
                    ELSE MAX(excluded.highest_score, COALESCE(profiles.highest_score, 0))
                END,
                updated_at_ms = excluded.updated_at_ms",
            params![
                user_id,
                i64::from(update.last_run_score),
                update.last_run_timestamp_ms as i64,
                update.highest_score.map(i64::from),
                now_unix_ms() as i64,
            ],
        )
        .map_err(|e| backend("merge_profile", e))?;
        Ok(())
    }

    fn highest_score(&self, user_id: &str) -> Result<Option<u32>, StoreError> {
        let conn = self.conn()?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT highest_score FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| backend("highest_score", e))?
            .flatten();

        value
            .map(|score| score_from_db("highest_score", score))
            .transpose()
    }
}

impl LeaderboardStore for SqliteStore {
    /// Name and photo always follow the latest write. The score only moves up,
    /// and `updated_at_ms` only moves with it so tie order stays first-come.
    fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO leaderboard (user_id, name, photo_url, highest_score, updated_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                photo_url = excluded.photo_url,
                updated_at_ms = CASE
                    WHEN excluded.highest_score > leaderboard.highest_score
                        THEN excluded.updated_at_ms
                    ELSE leaderboard.updated_at_ms
                END,
                highest_score = MAX(excluded.highest_score, leaderboard.highest_score)",
            params![
                entry.id,
                entry.name,
                entry.photo_url.as_deref(),
                i64::from(entry.highest_score),
                now_unix_ms() as i64,
            ],
        )
        .map_err(|e| backend("upsert_entry", e))?;
        Ok(())
    }

    /// Highest scores first; among equal scores, whoever got there first.
    fn top_entries(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT user_id, name, photo_url, highest_score FROM leaderboard
                 ORDER BY highest_score DESC, updated_at_ms ASC
                 LIMIT ?1",
            )
            .map_err(|e| backend("top_entries prepare", e))?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(|e| backend("top_entries query", e))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, name, photo_url, score) = row.map_err(|e| backend("top_entries row", e))?;
            entries.push(LeaderboardEntry {
                id,
                name,
                photo_url,
                highest_score: score_from_db("highest_score", score)?,
            });
        }
        Ok(entries)
    }
}
