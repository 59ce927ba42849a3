pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Prompt API
        .route("/api/v1/prompts", get(handlers::handle_list_prompts))
        .route("/api/v1/prompts/generate", post(handlers::handle_generate))
        .route("/api/v1/prompts/preview", post(handlers::handle_preview))
        .route("/api/v1/prompts/analyze", post(handlers::handle_analyze))
        .route("/api/v1/prompts/:id", get(handlers::handle_get_prompt))
        .route(
            "/api/v1/prompts/:id/interactions/:kind",
            post(handlers::handle_interaction),
        )
        // Analytics API
        .route(
            "/api/v1/analytics/generation",
            get(analytics::handle_generation_summary),
        )
        .with_state(state)
}
