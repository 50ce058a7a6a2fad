use std::time::{SystemTime, UNIX_EPOCH};

use ecocity_snake_core::{submit_run, Identity, RunResult};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::AppState;

pub(crate) fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}

/// Persist a finished run without holding up the caller.
///
/// The handler drops the returned handle: the response goes out immediately
/// and store failures end up in the log only. Nothing is retried.
pub(crate) fn spawn_run_submission(
    state: AppState,
    run_id: Uuid,
    identity: Identity,
    run: RunResult,
    previous_highest: Option<u32>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let store = state.store.clone();
        let user_id = identity.id.clone();
        let written = tokio::task::spawn_blocking(move || {
            submit_run(
                &*store,
                &*store,
                Some(&identity),
                run,
                previous_highest,
            )
        })
        .await;

        let report = match written {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(run_id = %run_id, user_id = %user_id, "submission worker join failure: {err}");
                return;
            }
        };

        if let Some(err) = &report.profile_error {
            tracing::error!(run_id = %run_id, user_id = %user_id, "profile write failed: {err}");
        }
        if let Some(err) = &report.leaderboard_error {
            tracing::error!(run_id = %run_id, user_id = %user_id, "leaderboard write failed: {err}");
        }
        if report.is_clean() {
            tracing::info!(
                run_id = %run_id,
                user_id = %user_id,
                score = run.score,
                new_best = report.new_best,
                "run recorded"
            );
        }
    })
}
