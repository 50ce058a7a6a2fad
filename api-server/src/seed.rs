use std::{fs, path::Path};

use ecocity_snake_core::LeaderboardEntry;

/// Built-in rows shown until real players outscore them.
pub(crate) fn default_seed_entries() -> Vec<LeaderboardEntry> {
    [
        ("seed-greenleaf", "GreenLeaf", 420),
        ("seed-recyclerex", "RecycleRex", 360),
        ("seed-compostqueen", "CompostQueen", 310),
        ("seed-canhunter", "CanHunter", 250),
        ("seed-paperpilot", "PaperPilot", 180),
        ("seed-ecobuddy", "EcoBuddy", 120),
    ]
    .into_iter()
    .map(|(id, name, highest_score)| LeaderboardEntry {
        id: id.to_string(),
        name: name.to_string(),
        photo_url: None,
        highest_score,
    })
    .collect()
}

/// Seed rows from a JSON array file, or the built-in list when no path is set.
pub(crate) fn load_seed_entries(path: Option<&Path>) -> Result<Vec<LeaderboardEntry>, String> {
    let Some(path) = path else {
        return Ok(default_seed_entries());
    };
    let bytes = fs::read(path)
        .map_err(|e| format!("failed to read seed file {}: {e}", path.display()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| format!("failed to parse seed file {}: {e}", path.display()))
}
