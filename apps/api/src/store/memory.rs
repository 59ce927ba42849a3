use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::prompt::{GeneratedArtifact, InteractionCounters, InteractionKind};
use crate::store::{PromptStore, StoreError};

/// Process-local store used when no database is configured. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<Uuid, GeneratedArtifact>>,
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn save(&self, artifact: &GeneratedArtifact) -> Result<GeneratedArtifact, StoreError> {
        self.prompts
            .write()
            .await
            .insert(artifact.id, artifact.clone());
        Ok(artifact.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<GeneratedArtifact>, StoreError> {
        Ok(self.prompts.read().await.get(&id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<GeneratedArtifact>, StoreError> {
        let prompts = self.prompts.read().await;
        let mut all: Vec<GeneratedArtifact> = prompts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }

    async fn record_interaction(
        &self,
        id: Uuid,
        kind: InteractionKind,
    ) -> Result<Option<InteractionCounters>, StoreError> {
        let mut prompts = self.prompts.write().await;
        Ok(prompts.get_mut(&id).map(|artifact| {
            artifact.analytics.bump(kind);
            artifact.analytics
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::analytics::Provider;
    use crate::models::prompt::{PromptFields, PromptMetadata, ARTIFACT_SCHEMA_VERSION};

    fn artifact(content: &str, age_secs: i64) -> GeneratedArtifact {
        let created_at = Utc::now() - Duration::seconds(age_secs);
        GeneratedArtifact {
            id: Uuid::new_v4(),
            content: content.to_string(),
            fields: PromptFields {
                task: Some(content.to_string()),
                ..Default::default()
            },
            metadata: PromptMetadata {
                version: ARTIFACT_SCHEMA_VERSION.to_string(),
                generated_at: created_at,
                optimized: false,
                ai_enhanced: false,
                generation_time: 3,
                provider: Provider::Fallback,
            },
            word_count: 1,
            character_count: content.len(),
            keywords: vec![],
            complexity_score: 2,
            analytics: InteractionCounters::default(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let store = InMemoryPromptStore::default();
        let saved = store.save(&artifact("Plan", 0)).await.unwrap();
        let found = store.find(saved.id).await.unwrap().unwrap();
        assert_eq!(found, saved);
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let store = InMemoryPromptStore::default();
        store.save(&artifact("oldest", 30)).await.unwrap();
        store.save(&artifact("newest", 0)).await.unwrap();
        store.save(&artifact("middle", 10)).await.unwrap();

        let recent = store.recent(2).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle"]);
    }

    #[tokio::test]
    async fn test_record_interaction_bumps_counter() {
        let store = InMemoryPromptStore::default();
        let saved = store.save(&artifact("Plan", 0)).await.unwrap();

        store
            .record_interaction(saved.id, InteractionKind::View)
            .await
            .unwrap();
        let counters = store
            .record_interaction(saved.id, InteractionKind::View)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counters.views, 2);
        assert_eq!(counters.copies, 0);

        let unknown = store
            .record_interaction(Uuid::new_v4(), InteractionKind::Copy)
            .await
            .unwrap();
        assert!(unknown.is_none());
    }
}
