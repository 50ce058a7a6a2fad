//! Score submission: what to write after a run, and the store seams it is
//! written through.
//!
//! Writes are best effort. [`submit_run`] never retries and never fails the
//! caller; every store error is handed back in the [`SubmitReport`] so the
//! caller's error sink can log it.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DISPLAY_NAME;
use crate::error::StoreError;
use crate::leaderboard::LeaderboardEntry;
use crate::session::RunResult;

/// The signed-in player as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            photo_url: None,
        }
    }

    pub fn name_or_default(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Partial profile update. `highest_score: None` leaves the stored value alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub last_run_score: u32,
    pub last_run_timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPlan {
    pub user_id: String,
    pub profile: ProfileUpdate,
    pub leaderboard: Option<LeaderboardEntry>,
}

impl SubmissionPlan {
    pub fn is_new_best(&self) -> bool {
        self.leaderboard.is_some()
    }
}

/// Per-user profile documents. Merges must leave fields the update does not
/// carry untouched.
pub trait ProfileStore {
    fn merge_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), StoreError>;

    fn highest_score(&self, user_id: &str) -> Result<Option<u32>, StoreError>;
}

/// Ranked per-user rows. An upsert replaces the row's name, photo and score.
pub trait LeaderboardStore {
    fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError>;

    fn top_entries(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

/// Decide the writes for a finished run. A missing previous best counts as 0.
pub fn plan_submission(
    identity: &Identity,
    run: RunResult,
    previous_highest: Option<u32>,
) -> SubmissionPlan {
    let previous = previous_highest.unwrap_or(0);
    let new_best = run.score > previous;

    SubmissionPlan {
        user_id: identity.id.clone(),
        profile: ProfileUpdate {
            last_run_score: run.score,
            last_run_timestamp_ms: run.finished_at_ms,
            highest_score: new_best.then_some(run.score),
        },
        leaderboard: new_best.then(|| LeaderboardEntry {
            id: identity.id.clone(),
            name: identity.name_or_default().to_string(),
            photo_url: identity.photo_url.clone(),
            highest_score: run.score,
        }),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// `false` when there was no identity to submit for.
    pub attempted: bool,
    pub new_best: bool,
    pub profile_error: Option<StoreError>,
    pub leaderboard_error: Option<StoreError>,
}

impl SubmitReport {
    pub fn is_clean(&self) -> bool {
        self.profile_error.is_none() && self.leaderboard_error.is_none()
    }
}

/// Apply a run to the stores. Anonymous runs are skipped. The two writes are
/// independent: a failed profile merge does not stop the leaderboard upsert.
pub fn submit_run(
    profiles: &dyn ProfileStore,
    leaderboard: &dyn LeaderboardStore,
    identity: Option<&Identity>,
    run: RunResult,
    previous_highest: Option<u32>,
) -> SubmitReport {
    let Some(identity) = identity else {
        return SubmitReport::default();
    };

    let plan = plan_submission(identity, run, previous_highest);
    let mut report = SubmitReport {
        attempted: true,
        new_best: plan.is_new_best(),
        ..SubmitReport::default()
    };

    if let Err(err) = profiles.merge_profile(&plan.user_id, &plan.profile) {
        report.profile_error = Some(err);
    }
    if let Some(entry) = &plan.leaderboard {
        if let Err(err) = leaderboard.upsert_entry(entry) {
            report.leaderboard_error = Some(err);
        }
    }
    report
}
