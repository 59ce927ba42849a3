mod analytics;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::sink::{AnalyticsSink, InMemoryAnalyticsSink, PgAnalyticsSink};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryPromptStore, PgPromptStore, PromptStore};

/// How long shutdown waits for queued analytics events to be written.
const ANALYTICS_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Promptcraft API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: Postgres when configured, process memory otherwise
    let (store, analytics): (Arc<dyn PromptStore>, Arc<dyn AnalyticsSink>) =
        match &config.database_url {
            Some(url) => {
                let db = create_pool(url).await?;
                (
                    Arc::new(PgPromptStore::new(db.clone())),
                    Arc::new(PgAnalyticsSink::new(db)),
                )
            }
            None => {
                warn!("DATABASE_URL not set; prompts and analytics are kept in memory only");
                (
                    Arc::new(InMemoryPromptStore::default()),
                    Arc::new(InMemoryAnalyticsSink::default()),
                )
            }
        };

    // Initialize LLM client
    let llm = Arc::new(GeminiClient::new(Duration::from_secs(
        config.llm_timeout_secs,
    )));
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; requests without an apiKey will be compiled locally");
    }

    let (state, analytics_worker) =
        AppState::build(llm, config.gemini_api_key.clone(), store, analytics);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and every recorder handle) is gone; let the worker drain.
    if tokio::time::timeout(ANALYTICS_DRAIN_TIMEOUT, analytics_worker)
        .await
        .is_err()
    {
        warn!("Timed out waiting for pending analytics events");
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
