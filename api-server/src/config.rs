use std::{env, path::PathBuf, sync::Arc};

use ecocity_snake_core::LeaderboardEntry;

use crate::SqliteStore;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";
// Live rows fetched before the seed merge; the display keeps the top ten.
pub(crate) const DEFAULT_LEADERBOARD_LIVE_LIMIT: usize = 10;
pub(crate) const MAX_LEADERBOARD_LIVE_LIMIT: usize = 100;
pub(crate) const DEFAULT_HTTP_KEEP_ALIVE_SECS: u64 = 75;
pub(crate) const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) data_dir: PathBuf,
    pub(crate) leaderboard_live_limit: usize,
    pub(crate) leaderboard_seed_path: Option<PathBuf>,
    pub(crate) api_key: Option<String>,
    pub(crate) http_workers: Option<usize>,
    pub(crate) http_keep_alive_secs: u64,
    pub(crate) json_limit_bytes: usize,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Self {
        let mut leaderboard_live_limit =
            read_env_usize("LEADERBOARD_LIVE_LIMIT", DEFAULT_LEADERBOARD_LIVE_LIMIT);
        if leaderboard_live_limit > MAX_LEADERBOARD_LIVE_LIMIT {
            tracing::warn!(
                "LEADERBOARD_LIVE_LIMIT ({}) exceeds {}. Clamping.",
                leaderboard_live_limit,
                MAX_LEADERBOARD_LIVE_LIMIT
            );
            leaderboard_live_limit = MAX_LEADERBOARD_LIVE_LIMIT;
        }

        Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            leaderboard_live_limit,
            leaderboard_seed_path: read_env_optional_string("LEADERBOARD_SEED_PATH")
                .map(PathBuf::from),
            api_key: read_env_optional_string("API_KEY"),
            http_workers: read_env_optional_usize("HTTP_WORKERS"),
            http_keep_alive_secs: read_env_u64(
                "HTTP_KEEP_ALIVE_SECS",
                DEFAULT_HTTP_KEEP_ALIVE_SECS,
            ),
            json_limit_bytes: read_env_usize("JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<SqliteStore>,
    /// Read-only seed rows merged into every leaderboard response.
    pub(crate) seed_entries: Arc<Vec<LeaderboardEntry>>,
    pub(crate) leaderboard_live_limit: usize,
    pub(crate) api_key: Option<Arc<str>>,
    pub(crate) http_workers: Option<usize>,
    pub(crate) http_keep_alive_secs: u64,
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_optional_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
