use ecocity_snake_core::LeaderboardEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitRunRequest {
    pub(crate) score: u32,
    /// Best score the client last read from the profile. Looked up server-side
    /// when omitted. Trusted only to decide whether a leaderboard write is
    /// attempted; the store never lowers a recorded best.
    #[serde(default)]
    pub(crate) previous_highest_score: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRunResponse {
    pub(crate) success: bool,
    pub(crate) run_id: Uuid,
    /// `false` for anonymous callers: nothing is written.
    pub(crate) submitted: bool,
    pub(crate) new_best: bool,
    pub(crate) score: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeaderboardResponse {
    pub(crate) success: bool,
    pub(crate) entries: Vec<LeaderboardEntry>,
    /// `false` when the live read failed and only seed rows are shown.
    pub(crate) live: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct ProfileRecord {
    pub(crate) user_id: String,
    pub(crate) last_run_score: u32,
    pub(crate) last_run_timestamp_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) highest_score: Option<u32>,
    pub(crate) updated_at_ms: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) stored_profiles: usize,
    pub(crate) leaderboard_rows: usize,
    pub(crate) seed_entries: usize,
    pub(crate) leaderboard_live_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) http_workers: Option<usize>,
    pub(crate) http_keep_alive_secs: u64,
    pub(crate) auth_required: bool,
}
