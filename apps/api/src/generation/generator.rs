//! Generation Orchestrator: AI-assisted generation with guaranteed local fallback.
//!
//! Flow: validate → start clock → one remote call → (remote text | compiled fields)
//!       → stop clock.
//!
//! The only error a caller can see is a `ValidationError`. Every remote failure
//! (transport error, quota, empty or malformed response, missing credential) is
//! recovered by compiling the fields locally. The remote client is called at
//! most once per `generate()`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::generation::compiler::compile;
use crate::generation::prompts::build_enhancement_prompt;
use crate::generation::validation::{validate_fields, ValidationError};
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::analytics::Provider;
use crate::models::prompt::PromptFields;

/// Result of one `generate()` call. `ai_enhanced` is true only when the remote
/// call returned usable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub content: String,
    pub ai_enhanced: bool,
    pub duration_ms: u64,
    pub provider: Provider,
    /// Why the remote path was abandoned. `None` on the AI path.
    pub fallback_reason: Option<String>,
}

pub struct PromptGenerator {
    client: Arc<dyn CompletionClient>,
    default_api_key: Option<String>,
}

impl PromptGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, default_api_key: Option<String>) -> Self {
        Self {
            client,
            default_api_key,
        }
    }

    pub async fn generate(
        &self,
        fields: &PromptFields,
        optimize: bool,
        api_key_override: Option<&str>,
    ) -> Result<GenerationOutcome, ValidationError> {
        validate_fields(fields).into_result()?;

        let start = Instant::now();

        let (content, provider, fallback_reason) =
            match self.try_remote(fields, optimize, api_key_override).await {
                Ok(text) => (text, Provider::Gemini, None),
                Err(e) => {
                    warn!("Remote generation failed, compiling locally: {e}");
                    (compile(fields, optimize), Provider::Fallback, Some(e.to_string()))
                }
            };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Prompt generated via {} in {}ms ({} chars)",
            provider.as_str(),
            duration_ms,
            content.len()
        );

        Ok(GenerationOutcome {
            content,
            ai_enhanced: provider == Provider::Gemini,
            duration_ms,
            provider,
            fallback_reason,
        })
    }

    async fn try_remote(
        &self,
        fields: &PromptFields,
        optimize: bool,
        api_key_override: Option<&str>,
    ) -> Result<String, LlmError> {
        let api_key = api_key_override
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.default_api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
            })
            .ok_or(LlmError::MissingApiKey)?;

        let prompt = build_enhancement_prompt(fields, optimize);
        let text = self.client.complete(&prompt, api_key).await?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockCompletionClient;

    fn poem_fields() -> PromptFields {
        PromptFields {
            task: Some("Write a poem".to_string()),
            role: Some("Poet".to_string()),
            tone: Some("Whimsical".to_string()),
            ..Default::default()
        }
    }

    fn generator(mock: MockCompletionClient, key: Option<&str>) -> PromptGenerator {
        PromptGenerator::new(Arc::new(mock), key.map(str::to_string))
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_compiled_fields() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Err(LlmError::QuotaExceeded("daily limit".to_string())));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), false, None)
            .await
            .unwrap();

        assert_eq!(outcome.content, "You are a Poet. Write a poem\n\nTone: Whimsical");
        assert!(!outcome.ai_enhanced);
        assert_eq!(outcome.provider, Provider::Fallback);
        assert!(outcome
            .fallback_reason
            .as_deref()
            .unwrap()
            .contains("daily limit"));
    }

    #[tokio::test]
    async fn test_remote_success_is_returned_verbatim_even_when_optimized() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Ok("X".to_string()));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), true, None)
            .await
            .unwrap();

        assert_eq!(outcome.content, "X");
        assert!(outcome.ai_enhanced);
        assert_eq!(outcome.provider, Provider::Gemini);
        assert!(outcome.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_blank_remote_text_falls_back() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Ok("   \n".to_string()));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), false, None)
            .await
            .unwrap();

        assert!(!outcome.ai_enhanced);
        assert!(!outcome.content.is_empty());
    }

    #[tokio::test]
    async fn test_override_key_takes_precedence() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|_prompt, key| key == "caller-key")
            .times(1)
            .returning(|_, _| Ok("enhanced".to_string()));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), false, Some("caller-key"))
            .await
            .unwrap();

        assert!(outcome.ai_enhanced);
    }

    #[tokio::test]
    async fn test_default_key_used_without_override() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|_prompt, key| key == "default-key")
            .times(1)
            .returning(|_, _| Ok("enhanced".to_string()));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), false, None)
            .await
            .unwrap();

        assert!(outcome.ai_enhanced);
    }

    #[tokio::test]
    async fn test_blank_override_uses_default_key() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|_prompt, key| key == "default-key")
            .times(1)
            .returning(|_, _| Ok("enhanced".to_string()));

        let outcome = generator(mock, Some("default-key"))
            .generate(&poem_fields(), false, Some("  "))
            .await
            .unwrap();

        assert!(outcome.ai_enhanced);
        assert!(outcome.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_blank_override_without_default_skips_remote_call() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();

        let outcome = generator(mock, None)
            .generate(&poem_fields(), false, Some(""))
            .await
            .unwrap();

        assert!(!outcome.ai_enhanced);
        assert_eq!(
            outcome.fallback_reason.as_deref(),
            Some("No API key configured")
        );
    }

    #[tokio::test]
    async fn test_missing_key_skips_remote_call() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();

        let outcome = generator(mock, None)
            .generate(&poem_fields(), false, None)
            .await
            .unwrap();

        assert!(!outcome.ai_enhanced);
        assert_eq!(
            outcome.fallback_reason.as_deref(),
            Some("No API key configured")
        );
    }

    #[tokio::test]
    async fn test_remote_prompt_carries_fields() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|prompt, _key| prompt.contains("Tone: Whimsical"))
            .times(1)
            .returning(|_, _| Ok("enhanced".to_string()));

        generator(mock, Some("k"))
            .generate(&poem_fields(), false, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_fields_never_call_remote() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();

        let err = generator(mock, Some("default-key"))
            .generate(&PromptFields::default(), false, None)
            .await
            .unwrap_err();

        assert!(err.errors.iter().any(|e| e.contains("Task is required")));
    }

    #[tokio::test]
    async fn test_fallback_for_any_valid_input_is_non_empty() {
        let inputs = [
            PromptFields {
                task: Some("a".to_string()),
                ..Default::default()
            },
            PromptFields {
                task: Some("Summarize".to_string()),
                custom_variables: Some("x=1".to_string()),
                ..Default::default()
            },
        ];

        for fields in inputs {
            let mut mock = MockCompletionClient::new();
            mock.expect_complete()
                .times(1)
                .returning(|_, _| Err(LlmError::EmptyContent));
            let outcome = generator(mock, Some("k"))
                .generate(&fields, false, None)
                .await
                .unwrap();
            assert!(!outcome.content.is_empty());
            assert!(!outcome.ai_enhanced);
        }
    }
}
