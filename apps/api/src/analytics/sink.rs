use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::models::analytics::{AnalyticsEvent, EventKind, GenerationSummary};
use crate::store::StoreError;

/// Append-only destination for generation outcome events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn append(&self, event: &AnalyticsEvent) -> Result<(), StoreError>;

    async fn summary(&self) -> Result<GenerationSummary, StoreError>;
}

#[derive(Clone)]
pub struct PgAnalyticsSink {
    pool: PgPool,
}

impl PgAnalyticsSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsSink for PgAnalyticsSink {
    async fn append(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events
                (id, kind, prompt_id, provider, duration_ms, word_count, character_count,
                 optimized, fallback_reason, ip, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(event.id)
        .bind(event.kind.as_str())
        .bind(event.prompt_id)
        .bind(event.provider.as_str())
        .bind(event.duration_ms as i64)
        .bind(event.word_count as i32)
        .bind(event.character_count as i32)
        .bind(event.optimized)
        .bind(event.fallback_reason.as_deref())
        .bind(event.request.ip.as_deref())
        .bind(event.request.user_agent.as_deref())
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn summary(&self) -> Result<GenerationSummary, StoreError> {
        let (successes, fallbacks, total_duration): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE kind = $1),
                COUNT(*) FILTER (WHERE kind = $2),
                COALESCE(SUM(duration_ms), 0)::BIGINT
            FROM analytics_events
            "#,
        )
        .bind(EventKind::AiGenerationSuccess.as_str())
        .bind(EventKind::AiGenerationFallback.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(GenerationSummary::from_counts(
            successes.max(0) as u64,
            fallbacks.max(0) as u64,
            total_duration.max(0) as u64,
        ))
    }
}

/// Sink used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryAnalyticsSink {
    events: RwLock<Vec<AnalyticsEvent>>,
}

#[cfg(test)]
impl InMemoryAnalyticsSink {
    pub async fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AnalyticsSink for InMemoryAnalyticsSink {
    async fn append(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn summary(&self) -> Result<GenerationSummary, StoreError> {
        let events = self.events.read().await;
        let successes = events
            .iter()
            .filter(|e| e.kind == EventKind::AiGenerationSuccess)
            .count() as u64;
        let fallbacks = events.len() as u64 - successes;
        let total_duration = events.iter().map(|e| e.duration_ms).sum();
        Ok(GenerationSummary::from_counts(
            successes,
            fallbacks,
            total_duration,
        ))
    }
}
