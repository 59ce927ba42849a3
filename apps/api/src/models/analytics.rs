use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which path produced the prompt content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Fallback,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Fallback => "fallback",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gemini" => Some(Self::Gemini),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AiGenerationSuccess,
    AiGenerationFallback,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::AiGenerationSuccess => "ai_generation_success",
            EventKind::AiGenerationFallback => "ai_generation_fallback",
        }
    }
}

/// Caller metadata captured from request headers. Both parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// One generation attempt. Append-only; never updated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub prompt_id: Option<Uuid>,
    pub provider: Provider,
    pub duration_ms: u64,
    pub word_count: usize,
    pub character_count: usize,
    pub optimized: bool,
    pub fallback_reason: Option<String>,
    #[serde(flatten)]
    pub request: RequestMeta,
    pub created_at: DateTime<Utc>,
}

/// Aggregate view over recorded generation outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub total: u64,
    pub ai_successes: u64,
    pub fallbacks: u64,
    /// AI successes over total, 0.0 when nothing was recorded.
    pub success_rate: f64,
    pub average_duration_ms: f64,
}

impl GenerationSummary {
    pub fn from_counts(ai_successes: u64, fallbacks: u64, total_duration_ms: u64) -> Self {
        let total = ai_successes + fallbacks;
        if total == 0 {
            return Self::default();
        }
        Self {
            total,
            ai_successes,
            fallbacks,
            success_rate: ai_successes as f64 / total as f64,
            average_duration_ms: total_duration_ms as f64 / total as f64,
        }
    }
}
