use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path},
    HttpRequest, HttpResponse, Responder,
};
use ecocity_snake_core::{
    build_display_leaderboard, plan_submission, LeaderboardStore, ProfileStore, RunResult,
};
use uuid::Uuid;

use crate::auth::{identity_from_headers, is_request_authorized};
use crate::response::{json_error_with_code, store_error};
use crate::submit::{now_unix_ms, spawn_run_submission};
use crate::{AppState, HealthResponse, LeaderboardResponse, SubmitRunRequest, SubmitRunResponse};

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let (stored_profiles, leaderboard_rows) = match state.store.counts() {
        Ok(counts) => counts,
        Err(e) => return store_error("health check", &e),
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "ecocity-snake-api",
        stored_profiles,
        leaderboard_rows,
        seed_entries: state.seed_entries.len(),
        leaderboard_live_limit: state.leaderboard_live_limit,
        http_workers: state.http_workers,
        http_keep_alive_secs: state.http_keep_alive_secs,
        auth_required: state.api_key.is_some(),
    })
}

/// Accept a finished run. The write is dispatched as a detached task, so the
/// response reflects what will be written, not what has been committed.
pub(crate) async fn submit_run(
    state: Data<AppState>,
    req: HttpRequest,
    body: Json<SubmitRunRequest>,
) -> impl Responder {
    if !is_request_authorized(req.headers(), state.api_key.as_deref()) {
        return unauthorized_response();
    }

    let body = body.into_inner();
    let run_id = Uuid::new_v4();
    let run = RunResult {
        score: body.score,
        finished_at_ms: now_unix_ms(),
    };

    let Some(identity) = identity_from_headers(req.headers()) else {
        tracing::debug!(run_id = %run_id, score = run.score, "anonymous run, nothing to store");
        return HttpResponse::Accepted().json(SubmitRunResponse {
            success: true,
            run_id,
            submitted: false,
            new_best: false,
            score: run.score,
        });
    };

    let previous_highest = match body.previous_highest_score {
        Some(previous) => Some(previous),
        None => match state.store.highest_score(&identity.id) {
            Ok(previous) => previous,
            Err(e) => return store_error("previous best lookup", &e),
        },
    };

    let new_best = plan_submission(&identity, run, previous_highest).is_new_best();
    drop(spawn_run_submission(
        state.get_ref().clone(),
        run_id,
        identity,
        run,
        previous_highest,
    ));

    HttpResponse::Accepted().json(SubmitRunResponse {
        success: true,
        run_id,
        submitted: true,
        new_best,
        score: run.score,
    })
}

/// Live top rows merged with the seed list. A failed live read degrades to
/// the seed rows alone instead of failing the request.
pub(crate) async fn get_leaderboard(state: Data<AppState>) -> impl Responder {
    let (live_rows, live) = match state.store.top_entries(state.leaderboard_live_limit) {
        Ok(rows) => (rows, true),
        Err(e) => {
            tracing::warn!("live leaderboard read failed, serving seed only: {e}");
            (Vec::new(), false)
        }
    };

    HttpResponse::Ok().json(LeaderboardResponse {
        success: true,
        entries: build_display_leaderboard(&live_rows, &state.seed_entries),
        live,
    })
}

pub(crate) async fn get_profile(state: Data<AppState>, path: Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    match state.store.get_profile(&user_id) {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => json_error_with_code(
            StatusCode::NOT_FOUND,
            format!("profile not found: {user_id}"),
            Some("profile_not_found"),
        ),
        Err(e) => store_error("get_profile", &e),
    }
}

fn unauthorized_response() -> HttpResponse {
    json_error_with_code(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        Some("unauthorized"),
    )
}
