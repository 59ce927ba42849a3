use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::analytics::Provider;
use crate::models::prompt::{
    GeneratedArtifact, InteractionCounters, InteractionKind, PromptMetadata,
};
use crate::store::{PromptStore, StoreError};

#[derive(Debug, Clone, FromRow)]
pub struct PromptRow {
    pub id: Uuid,
    pub content: String,
    pub fields: Value,
    pub schema_version: String,
    pub optimized: bool,
    pub ai_enhanced: bool,
    pub provider: String,
    pub generation_time_ms: i64,
    pub word_count: i32,
    pub character_count: i32,
    pub keywords: Vec<String>,
    pub complexity_score: i16,
    pub views: i32,
    pub copies: i32,
    pub exports: i32,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PromptRow> for GeneratedArtifact {
    type Error = StoreError;

    fn try_from(row: PromptRow) -> Result<Self, Self::Error> {
        let provider = Provider::parse(&row.provider)
            .ok_or_else(|| StoreError::CorruptRow(format!("unknown provider '{}'", row.provider)))?;

        Ok(GeneratedArtifact {
            id: row.id,
            content: row.content,
            fields: serde_json::from_value(row.fields)?,
            metadata: PromptMetadata {
                version: row.schema_version,
                generated_at: row.generated_at,
                optimized: row.optimized,
                ai_enhanced: row.ai_enhanced,
                generation_time: row.generation_time_ms.max(0) as u64,
                provider,
            },
            word_count: row.word_count.max(0) as usize,
            character_count: row.character_count.max(0) as usize,
            keywords: row.keywords,
            complexity_score: row.complexity_score.clamp(0, u8::MAX as i16) as u8,
            analytics: counters(row.views, row.copies, row.exports),
            created_at: row.created_at,
        })
    }
}

fn counters(views: i32, copies: i32, exports: i32) -> InteractionCounters {
    InteractionCounters {
        views: views.max(0) as u32,
        copies: copies.max(0) as u32,
        exports: exports.max(0) as u32,
    }
}

#[derive(Clone)]
pub struct PgPromptStore {
    pool: PgPool,
}

impl PgPromptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromptStore for PgPromptStore {
    async fn save(&self, artifact: &GeneratedArtifact) -> Result<GeneratedArtifact, StoreError> {
        let fields = serde_json::to_value(&artifact.fields)?;

        let row = sqlx::query_as::<_, PromptRow>(
            r#"
            INSERT INTO prompts
                (id, content, fields, schema_version, optimized, ai_enhanced, provider,
                 generation_time_ms, word_count, character_count, keywords, complexity_score,
                 views, copies, exports, generated_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(artifact.id)
        .bind(&artifact.content)
        .bind(&fields)
        .bind(&artifact.metadata.version)
        .bind(artifact.metadata.optimized)
        .bind(artifact.metadata.ai_enhanced)
        .bind(artifact.metadata.provider.as_str())
        .bind(artifact.metadata.generation_time as i64)
        .bind(artifact.word_count as i32)
        .bind(artifact.character_count as i32)
        .bind(&artifact.keywords)
        .bind(artifact.complexity_score as i16)
        .bind(artifact.analytics.views as i32)
        .bind(artifact.analytics.copies as i32)
        .bind(artifact.analytics.exports as i32)
        .bind(artifact.metadata.generated_at)
        .bind(artifact.created_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved prompt {}", row.id);
        row.try_into()
    }

    async fn find(&self, id: Uuid) -> Result<Option<GeneratedArtifact>, StoreError> {
        sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(GeneratedArtifact::try_from)
            .transpose()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<GeneratedArtifact>, StoreError> {
        sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts ORDER BY created_at DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(GeneratedArtifact::try_from)
            .collect()
    }

    async fn record_interaction(
        &self,
        id: Uuid,
        kind: InteractionKind,
    ) -> Result<Option<InteractionCounters>, StoreError> {
        // Column name comes from a closed enum, never from request input.
        let column = kind.column();
        let query = format!(
            "UPDATE prompts SET {column} = {column} + 1 WHERE id = $1 \
             RETURNING views, copies, exports"
        );

        let row: Option<(i32, i32, i32)> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(views, copies, exports)| counters(views, copies, exports)))
    }
}
