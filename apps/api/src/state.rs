use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::analytics::recorder::AnalyticsRecorder;
use crate::analytics::sink::AnalyticsSink;
use crate::generation::generator::PromptGenerator;
use crate::generation::pipeline::PromptPipeline;
use crate::llm_client::CompletionClient;
use crate::store::PromptStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PromptPipeline>,
    pub store: Arc<dyn PromptStore>,
    /// Read side of analytics. Writes go through the pipeline's recorder.
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl AppState {
    /// Wires the pipeline and starts the analytics worker. The returned handle
    /// completes once every state clone has been dropped and the queue is drained.
    pub fn build(
        llm: Arc<dyn CompletionClient>,
        default_api_key: Option<String>,
        store: Arc<dyn PromptStore>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> (Self, JoinHandle<()>) {
        let (recorder, worker) = AnalyticsRecorder::spawn(analytics.clone());
        let generator = PromptGenerator::new(llm, default_api_key);

        let state = AppState {
            pipeline: Arc::new(PromptPipeline::new(generator, recorder)),
            store,
            analytics,
        };
        (state, worker)
    }
}
