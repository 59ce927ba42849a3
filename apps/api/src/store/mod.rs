//! Persistence for generated prompts.
//!
//! The generation core never depends on a store; handlers decide whether to save.
//! `PgPromptStore` is used when `DATABASE_URL` is set, `InMemoryPromptStore` otherwise.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::prompt::{GeneratedArtifact, InteractionCounters, InteractionKind};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPromptStore;
pub use postgres::PgPromptStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Persists the artifact and returns it as stored.
    async fn save(&self, artifact: &GeneratedArtifact) -> Result<GeneratedArtifact, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<GeneratedArtifact>, StoreError>;

    /// Most recently created artifacts first.
    async fn recent(&self, limit: usize) -> Result<Vec<GeneratedArtifact>, StoreError>;

    /// Increments one interaction counter. `None` when the prompt does not exist.
    async fn record_interaction(
        &self,
        id: Uuid,
        kind: InteractionKind,
    ) -> Result<Option<InteractionCounters>, StoreError>;
}
