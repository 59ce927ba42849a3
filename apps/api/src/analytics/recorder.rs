//! Analytics Recorder: fire-and-forget delivery of generation outcome events.
//!
//! `record()` only enqueues; a background task drains the queue into the sink.
//! Sink failures are logged and dropped. A full queue drops the event instead
//! of waiting, so the response path never blocks on analytics.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analytics::sink::AnalyticsSink;
use crate::generation::generator::GenerationOutcome;
use crate::models::analytics::{AnalyticsEvent, EventKind, Provider, RequestMeta};
use crate::models::prompt::GeneratedArtifact;

pub const QUEUE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AnalyticsRecorder {
    tx: mpsc::Sender<AnalyticsEvent>,
}

impl AnalyticsRecorder {
    /// Starts the background writer. It stops once every recorder clone is dropped
    /// and the queue has drained.
    pub fn spawn(sink: Arc<dyn AnalyticsSink>) -> (Self, JoinHandle<()>) {
        Self::spawn_with_capacity(sink, QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(
        sink: Arc<dyn AnalyticsSink>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AnalyticsEvent>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match sink.append(&event).await {
                    Ok(()) => debug!("Recorded {} event {}", event.kind.as_str(), event.id),
                    Err(e) => warn!(
                        "Failed to record {} event {}: {e}",
                        event.kind.as_str(),
                        event.id
                    ),
                }
            }
            debug!("Analytics worker stopped");
        });

        (Self { tx }, worker)
    }

    pub fn record(&self, event: AnalyticsEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Analytics queue full, dropping {} event", event.kind.as_str())
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    "Analytics worker stopped, dropping {} event",
                    event.kind.as_str()
                )
            }
        }
    }
}

/// Builds the outcome event for one finished generation.
pub fn generation_event(
    artifact: &GeneratedArtifact,
    outcome: &GenerationOutcome,
    request: RequestMeta,
) -> AnalyticsEvent {
    let kind = match outcome.provider {
        Provider::Gemini => EventKind::AiGenerationSuccess,
        Provider::Fallback => EventKind::AiGenerationFallback,
    };

    AnalyticsEvent {
        id: Uuid::new_v4(),
        kind,
        prompt_id: Some(artifact.id),
        provider: outcome.provider,
        duration_ms: outcome.duration_ms,
        word_count: artifact.word_count,
        character_count: artifact.character_count,
        optimized: artifact.metadata.optimized,
        fallback_reason: outcome.fallback_reason.clone(),
        request,
        created_at: Utc::now(),
    }
}
