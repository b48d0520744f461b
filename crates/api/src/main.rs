//! Mandalog API server.
//!
//! JSON REST API over the reflection domain engine: goal trees, journal
//! entries, AI summaries and analytics, persona chat.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use database::{summary, Database};
use openai_insight::{OpenAiConfig, OpenAiModel};
use reflection::persona::seed_default_personas;
use reflection::time;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

/// How often expired summary rows are pruned.
const PRUNE_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Mandalog API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    seed_default_personas(&db).await?;

    // Model backend. A missing key is not fatal: the model reports not
    // ready and every enrichment path falls back, while journal and
    // progress writes keep working.
    let model_config = OpenAiConfig::from_env().unwrap_or_else(|err| {
        warn!("model backend not configured ({}), AI features will use fallbacks", err);
        OpenAiConfig::default()
    });
    let model = Arc::new(OpenAiModel::new(model_config)?);

    // Build application state
    let state = AppState::new(
        db.clone(),
        model,
        &config.jwt_secret,
        config.token_expiry_secs,
    );

    // Prune expired summary cache rows in the background
    tokio::spawn(prune_expired_summaries(db));

    // Build router
    let app = routes::router(state).layer(cors_layer(&config));

    // Start server
    info!(addr = %config.addr, "Mandalog API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any);

    match config
        .cors_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Periodic sweep of expired `goal_summaries` rows.
async fn prune_expired_summaries(db: Database) {
    let mut interval = tokio::time::interval(Duration::from_secs(PRUNE_INTERVAL_SECS));
    loop {
        interval.tick().await;
        match summary::delete_expired(db.pool(), &time::now()).await {
            Ok(0) => {}
            Ok(count) => info!(count, "pruned expired summaries"),
            Err(err) => warn!("summary prune failed: {}", err),
        }
    }
}
