//! Axum route handlers for the Prompt API.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::compiler::compile;
use crate::generation::metrics::{complexity_score, keywords, measure};
use crate::generation::validation::{validate_fields, ValidationReport};
use crate::models::analytics::RequestMeta;
use crate::models::prompt::{GeneratedArtifact, InteractionCounters, InteractionKind, PromptFields};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub fields: PromptFields,
    #[serde(default)]
    pub optimize: bool,
    /// Used verbatim instead of the configured provider key.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_save")]
    pub save: bool,
}

fn default_save() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub prompt: GeneratedArtifact,
    pub saved: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub fields: PromptFields,
    #[serde(default)]
    pub optimize: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub content: String,
    pub word_count: usize,
    pub character_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub validation: ValidationReport,
    pub keywords: Vec<String>,
    pub complexity_score: u8,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub prompts: Vec<GeneratedArtifact>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/prompts/generate
///
/// Runs the generation pipeline. Always answers 201 with a usable prompt once the
/// fields validate; `prompt.metadata.aiEnhanced` tells the caller which path ran.
/// A failed save is logged and reported via `saved: false`.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let artifact = state
        .pipeline
        .generate_prompt(
            &request.fields,
            request.optimize,
            request.api_key.as_deref(),
            request_meta(&headers),
        )
        .await?;

    let saved = if request.save {
        match state.store.save(&artifact).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Generated prompt {} could not be saved: {e}", artifact.id);
                false
            }
        }
    } else {
        false
    };

    let message = if artifact.metadata.ai_enhanced {
        "Prompt generated with AI enhancement"
    } else {
        "Prompt generated locally"
    };

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            prompt: artifact,
            saved,
            message: message.to_string(),
        }),
    ))
}

/// POST /api/v1/prompts/preview
///
/// Local compilation only: no remote call, no analytics, nothing saved.
pub async fn handle_preview(
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let fields = request.fields.normalized();
    validate_fields(&fields).into_result()?;

    let content = compile(&fields, request.optimize);
    let measured = measure(&content);

    Ok(Json(PreviewResponse {
        content,
        word_count: measured.word_count,
        character_count: measured.character_count,
    }))
}

/// POST /api/v1/prompts/analyze
///
/// Keywords, complexity and the validation report for a field set. Never fails on
/// invalid fields; the report says what is wrong.
pub async fn handle_analyze(Json(fields): Json<PromptFields>) -> Json<AnalyzeResponse> {
    let fields = fields.normalized();
    Json(AnalyzeResponse {
        validation: validate_fields(&fields),
        keywords: keywords(&fields),
        complexity_score: complexity_score(&fields),
    })
}

/// GET /api/v1/prompts
pub async fn handle_list_prompts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let prompts = state.store.recent(limit).await?;
    Ok(Json(ListResponse { prompts }))
}

/// GET /api/v1/prompts/:id
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<Uuid>,
) -> Result<Json<GeneratedArtifact>, AppError> {
    let prompt = state
        .store
        .find(prompt_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {prompt_id} not found")))?;
    Ok(Json(prompt))
}

/// POST /api/v1/prompts/:id/interactions/:kind
///
/// Bumps the view/copy/export counter of a saved prompt.
pub async fn handle_interaction(
    State(state): State<AppState>,
    Path((prompt_id, kind)): Path<(Uuid, String)>,
) -> Result<Json<InteractionCounters>, AppError> {
    let kind = InteractionKind::parse(&kind).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown interaction '{kind}' (expected view, copy or export)"
        ))
    })?;

    let counters = state
        .store
        .record_interaction(prompt_id, kind)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {prompt_id} not found")))?;
    Ok(Json(counters))
}

/// Client IP (first `x-forwarded-for` hop, else `x-real-ip`) and user agent.
pub fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_string);

    RequestMeta {
        ip,
        user_agent: header("user-agent").map(str::to_string),
    }
}
