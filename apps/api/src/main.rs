mod auth;
mod chat;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::token::TokenIssuer;
use crate::chat::fallback::FallbackResponder;
use crate::chat::service::{ChatResponder, ChatService};
use crate::config::{ChatMode, Config};
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::services::postgres_collaborators;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL. The service still starts without it.
    let db = connect_store(&config).await;

    let chat: Arc<dyn ChatResponder> = match (config.chat_mode, db.clone()) {
        (ChatMode::Live, Some(pool)) => {
            info!("Chat running in live mode");
            Arc::new(ChatService::new(postgres_collaborators(pool)))
        }
        (ChatMode::Live, None) => {
            warn!("Live chat requested but no database is available; using demo replies");
            Arc::new(FallbackResponder)
        }
        (ChatMode::Demo, _) => {
            info!("Chat running in demo mode");
            Arc::new(FallbackResponder)
        }
    };

    let tokens = TokenIssuer::new(&config.token_secret, config.token_ttl_hours)?;
    let cors = cors_layer(&config.cors_origins);

    // Build app state
    let state = AppState {
        db,
        tokens,
        chat,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects and ensures the schema. Any failure is logged and yields `None`.
async fn connect_store(config: &Config) -> Option<PgPool> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; running without a database");
        return None;
    };

    let pool = match create_pool(url).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!("PostgreSQL connection failed: {e}; running without a database");
            return None;
        }
    };

    if let Err(e) = ensure_schema(&pool).await {
        warn!("Schema setup failed: {e}; running without a database");
        return None;
    }
    Some(pool)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
