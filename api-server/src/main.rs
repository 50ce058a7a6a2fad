mod auth;
mod config;
mod handlers;
mod response;
mod seed;
mod store;
mod submit;
mod types;

use std::{sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

pub(crate) use config::{AppState, ServerConfig};
pub(crate) use store::SqliteStore;
pub(crate) use submit::now_unix_ms;
pub(crate) use types::{
    HealthResponse, LeaderboardResponse, ProfileRecord, SubmitRunRequest, SubmitRunResponse,
};

/// Register every route on an app. Shared by `main` and the handler tests.
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/api/runs", web::post().to(handlers::submit_run))
        .route("/api/leaderboard", web::get().to(handlers::get_leaderboard))
        .route(
            "/api/profiles/{user_id}",
            web::get().to(handlers::get_profile),
        );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();

    let store = SqliteStore::open(&config.data_dir).map_err(std::io::Error::other)?;
    let seed_entries = seed::load_seed_entries(config.leaderboard_seed_path.as_deref())
        .map_err(std::io::Error::other)?;

    tracing::info!(
        "starting ecocity snake api: bind_addr={} data_dir={} seed_entries={} live_limit={} auth_required={}",
        config.bind_addr,
        config.data_dir.display(),
        seed_entries.len(),
        config.leaderboard_live_limit,
        config.api_key.is_some()
    );

    let state = AppState {
        store: Arc::new(store),
        seed_entries: Arc::new(seed_entries),
        leaderboard_live_limit: config.leaderboard_live_limit,
        api_key: config.api_key.as_deref().map(Arc::from),
        http_workers: config.http_workers,
        http_keep_alive_secs: config.http_keep_alive_secs,
    };
    let json_limit = config.json_limit_bytes;

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().limit(json_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(config.http_keep_alive_secs));

    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind(config.bind_addr.as_str())?.run().await
}
