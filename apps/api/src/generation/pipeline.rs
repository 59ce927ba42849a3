//! Prompt pipeline: the `generate_prompt` operation.
//!
//! Flow: normalize fields → orchestrator (validate, remote | local) → measure →
//!       build artifact → enqueue analytics event → return.
//!
//! Persistence is left to the caller. The analytics event is enqueued, never awaited.

use chrono::Utc;
use uuid::Uuid;

use crate::analytics::recorder::{generation_event, AnalyticsRecorder};
use crate::generation::generator::{GenerationOutcome, PromptGenerator};
use crate::generation::metrics::{complexity_score, keywords, measure};
use crate::generation::validation::ValidationError;
use crate::models::analytics::RequestMeta;
use crate::models::prompt::{
    GeneratedArtifact, InteractionCounters, PromptFields, PromptMetadata, ARTIFACT_SCHEMA_VERSION,
};

pub struct PromptPipeline {
    generator: PromptGenerator,
    recorder: AnalyticsRecorder,
}

impl PromptPipeline {
    pub fn new(generator: PromptGenerator, recorder: AnalyticsRecorder) -> Self {
        Self {
            generator,
            recorder,
        }
    }

    pub async fn generate_prompt(
        &self,
        fields: &PromptFields,
        optimize: bool,
        api_key_override: Option<&str>,
        request: RequestMeta,
    ) -> Result<GeneratedArtifact, ValidationError> {
        let fields = fields.normalized();
        let outcome = self
            .generator
            .generate(&fields, optimize, api_key_override)
            .await?;

        let artifact = build_artifact(fields, optimize, &outcome);
        self.recorder
            .record(generation_event(&artifact, &outcome, request));

        Ok(artifact)
    }
}

/// Assembles the artifact for a finished generation. Counters start at zero.
pub fn build_artifact(
    fields: PromptFields,
    optimize: bool,
    outcome: &GenerationOutcome,
) -> GeneratedArtifact {
    let now = Utc::now();
    let measured = measure(&outcome.content);

    GeneratedArtifact {
        id: Uuid::new_v4(),
        content: outcome.content.clone(),
        keywords: keywords(&fields),
        complexity_score: complexity_score(&fields),
        fields,
        metadata: PromptMetadata {
            version: ARTIFACT_SCHEMA_VERSION.to_string(),
            generated_at: now,
            optimized: optimize,
            ai_enhanced: outcome.ai_enhanced,
            generation_time: outcome.duration_ms,
            provider: outcome.provider,
        },
        word_count: measured.word_count,
        character_count: measured.character_count,
        analytics: InteractionCounters::default(),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analytics::sink::InMemoryAnalyticsSink;
    use crate::llm_client::{LlmError, MockCompletionClient};
    use crate::models::analytics::{EventKind, Provider};

    fn poem_fields() -> PromptFields {
        PromptFields {
            task: Some("Write a poem".to_string()),
            role: Some("Poet".to_string()),
            tone: Some("Whimsical".to_string()),
            ..Default::default()
        }
    }

    fn pipeline(
        mock: MockCompletionClient,
    ) -> (
        PromptPipeline,
        Arc<InMemoryAnalyticsSink>,
        tokio::task::JoinHandle<()>,
    ) {
        let sink = Arc::new(InMemoryAnalyticsSink::default());
        let (recorder, worker) = AnalyticsRecorder::spawn(sink.clone());
        let generator = PromptGenerator::new(Arc::new(mock), Some("key".to_string()));
        (PromptPipeline::new(generator, recorder), sink, worker)
    }

    #[tokio::test]
    async fn test_fallback_artifact_and_event() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Err(LlmError::EmptyContent));
        let (pipeline, sink, worker) = pipeline(mock);

        let request = RequestMeta {
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("test-agent".to_string()),
        };
        let artifact = pipeline
            .generate_prompt(&poem_fields(), false, None, request.clone())
            .await
            .unwrap();

        assert_eq!(artifact.content, "You are a Poet. Write a poem\n\nTone: Whimsical");
        assert!(!artifact.metadata.ai_enhanced);
        assert_eq!(artifact.metadata.provider, Provider::Fallback);
        assert_eq!(artifact.metadata.version, ARTIFACT_SCHEMA_VERSION);
        assert_eq!(artifact.word_count, 9);
        assert_eq!(artifact.character_count, artifact.content.chars().count());
        assert_eq!(artifact.analytics, InteractionCounters::default());
        assert_eq!(artifact.complexity_score, 3);
        assert_eq!(artifact.keywords, vec!["poet", "write", "poem", "whimsical"]);

        drop(pipeline);
        worker.await.unwrap();
        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::AiGenerationFallback);
        assert_eq!(events[0].prompt_id, Some(artifact.id));
        assert_eq!(events[0].word_count, artifact.word_count);
        assert_eq!(events[0].request, request);
        assert!(events[0].fallback_reason.is_some());
    }

    #[tokio::test]
    async fn test_ai_artifact_keeps_remote_text() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Ok("X".to_string()));
        let (pipeline, sink, worker) = pipeline(mock);

        let artifact = pipeline
            .generate_prompt(&poem_fields(), true, None, RequestMeta::default())
            .await
            .unwrap();

        assert_eq!(artifact.content, "X");
        assert!(artifact.metadata.ai_enhanced);
        assert!(artifact.metadata.optimized);
        assert_eq!(artifact.word_count, 1);
        assert_eq!(artifact.character_count, 1);

        drop(pipeline);
        worker.await.unwrap();
        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::AiGenerationSuccess);
        assert_eq!(events[0].provider, Provider::Gemini);
        assert!(events[0].optimized);
    }

    #[tokio::test]
    async fn test_invalid_fields_record_nothing() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();
        let (pipeline, sink, worker) = pipeline(mock);

        let err = pipeline
            .generate_prompt(&PromptFields::default(), false, None, RequestMeta::default())
            .await
            .unwrap_err();
        assert!(err.errors.iter().any(|e| e.contains("Task is required")));

        drop(pipeline);
        worker.await.unwrap();
        assert!(sink.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_fields_are_normalized_before_generation() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Err(LlmError::MissingApiKey));
        let (pipeline, _sink, _worker) = pipeline(mock);

        let fields = PromptFields {
            task: Some("  Outline a talk  ".to_string()),
            tone: Some("   ".to_string()),
            ..Default::default()
        };
        let artifact = pipeline
            .generate_prompt(&fields, false, None, RequestMeta::default())
            .await
            .unwrap();

        assert_eq!(artifact.content, "Outline a talk");
        assert_eq!(artifact.fields.task.as_deref(), Some("Outline a talk"));
        assert!(artifact.fields.tone.is_none());
    }
}
