//! Axum route handlers for generation analytics.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::analytics::GenerationSummary;
use crate::state::AppState;

/// GET /api/v1/analytics/generation
///
/// AI success vs. local fallback counts over every recorded generation.
pub async fn handle_generation_summary(
    State(state): State<AppState>,
) -> Result<Json<GenerationSummary>, AppError> {
    let summary = state.analytics.summary().await?;
    Ok(Json(summary))
}
