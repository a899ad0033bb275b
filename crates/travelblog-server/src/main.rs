mod config;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use travelblog_api::{AppStateInner, api_router};
use travelblog_db::Database;
use travelblog_db::seed::seed_destinations;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "travelblog=debug,travelblog_api=debug,travelblog_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // A store that fails to open is logged, not fatal: the listener still
    // starts and data routes answer 500.
    let db = match Database::open(&config.db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            error!("Database connection error: {:#}", e);
            None
        }
    };
    let state = AppStateInner::new(db);

    // Seeding runs alongside startup; its failure is only logged.
    let seed_state = state.clone();
    tokio::task::spawn_blocking(move || {
        if let Some(db) = &seed_state.db {
            if let Err(e) = seed_destinations(db) {
                error!("Error initializing destinations: {:#}", e);
            }
        }
    });

    let app = api_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
