// Prompt generation pipeline.
// Implements: validation gate, field compiler, metrics extractor, orchestrator with
// local fallback, and the HTTP handlers that expose them.
// All remote calls go through llm_client, never directly from here.

pub mod compiler;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod validation;
