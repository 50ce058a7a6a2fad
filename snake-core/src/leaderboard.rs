use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_DISPLAY_LIMIT;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The owning user's id.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub highest_score: u32,
}

/// Merge live rows with the static seed list for display: top
/// [`LEADERBOARD_DISPLAY_LIMIT`] by score.
pub fn build_display_leaderboard(
    live: &[LeaderboardEntry],
    seed: &[LeaderboardEntry],
) -> Vec<LeaderboardEntry> {
    build_display_leaderboard_with_limit(live, seed, LEADERBOARD_DISPLAY_LIMIT)
}

/// Union by id with live rows taking precedence, then a stable sort by
/// `highest_score` descending.
///
/// Equal scores keep union order: live rows in the order given, followed by
/// the seed rows that no live row replaced. Repeated ids inside one list keep
/// their first occurrence.
pub fn build_display_leaderboard_with_limit(
    live: &[LeaderboardEntry],
    seed: &[LeaderboardEntry],
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(live.len() + seed.len());
    let mut merged: Vec<LeaderboardEntry> = Vec::with_capacity(live.len() + seed.len());

    for entry in live.iter().chain(seed.iter()) {
        if seen.insert(entry.id.as_str()) {
            merged.push(entry.clone());
        }
    }

    // `sort_by` is stable.
    merged.sort_by(|a, b| b.highest_score.cmp(&a.highest_score));
    merged.truncate(limit);
    merged
}
