use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::analytics::Provider;

/// Schema version stamped on every generated artifact.
pub const ARTIFACT_SCHEMA_VERSION: &str = "1.0";

/// Structured prompt input collected by the UI. Only `task` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_variables: Option<String>,
}

impl PromptFields {
    /// Returns a copy with every attribute trimmed and blank attributes removed.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            role: clean(&self.role),
            task: clean(&self.task),
            context: clean(&self.context),
            tone: clean(&self.tone),
            output_format: clean(&self.output_format),
            constraints: clean(&self.constraints),
            response_length: clean(&self.response_length),
            audience: clean(&self.audience),
            industry: clean(&self.industry),
            mood: clean(&self.mood),
            language: clean(&self.language),
            complexity: clean(&self.complexity),
            custom_variables: clean(&self.custom_variables),
        }
    }
}

/// Returns the trimmed value of an optional field, or `None` when absent or blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMetadata {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub optimized: bool,
    pub ai_enhanced: bool,
    /// Milliseconds spent producing `content`, remote call included.
    pub generation_time: u64,
    pub provider: Provider,
}

/// Interaction counters. Mutated later through the interaction endpoint only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCounters {
    pub views: u32,
    pub copies: u32,
    pub exports: u32,
}

impl InteractionCounters {
    pub fn bump(&mut self, kind: InteractionKind) {
        match kind {
            InteractionKind::View => self.views += 1,
            InteractionKind::Copy => self.copies += 1,
            InteractionKind::Export => self.exports += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Copy,
    Export,
}

impl InteractionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "view" => Some(Self::View),
            "copy" => Some(Self::Copy),
            "export" => Some(Self::Export),
            _ => None,
        }
    }

    /// Column holding this counter in the `prompts` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::View => "views",
            Self::Copy => "copies",
            Self::Export => "exports",
        }
    }
}

/// The compiled prompt handed back to the caller (and optionally persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub id: Uuid,
    pub content: String,
    pub fields: PromptFields,
    pub metadata: PromptMetadata,
    pub word_count: usize,
    pub character_count: usize,
    pub keywords: Vec<String>,
    pub complexity_score: u8,
    pub analytics: InteractionCounters,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_drops_blank_fields() {
        let fields = PromptFields {
            role: Some("  Engineer ".to_string()),
            task: Some("\tShip it\n".to_string()),
            tone: Some("   ".to_string()),
            mood: Some(String::new()),
            ..Default::default()
        };

        let normalized = fields.normalized();
        assert_eq!(normalized.role.as_deref(), Some("Engineer"));
        assert_eq!(normalized.task.as_deref(), Some("Ship it"));
        assert!(normalized.tone.is_none());
        assert!(normalized.mood.is_none());
    }

    #[test]
    fn test_fields_deserialize_from_camel_case() {
        let json = serde_json::json!({
            "task": "Summarize the report",
            "outputFormat": "Bullet list",
            "responseLength": "Short",
            "customVariables": "{{company}}=Acme"
        });
        let fields: PromptFields = serde_json::from_value(json).unwrap();
        assert_eq!(fields.output_format.as_deref(), Some("Bullet list"));
        assert_eq!(fields.response_length.as_deref(), Some("Short"));
        assert_eq!(fields.custom_variables.as_deref(), Some("{{company}}=Acme"));
        assert!(fields.role.is_none());
    }

    #[test]
    fn test_interaction_kind_parse() {
        assert_eq!(InteractionKind::parse("copy"), Some(InteractionKind::Copy));
        assert_eq!(InteractionKind::parse("view"), Some(InteractionKind::View));
        assert_eq!(InteractionKind::parse("export"), Some(InteractionKind::Export));
        assert_eq!(InteractionKind::parse("share"), None);
    }

    #[test]
    fn test_counters_bump_only_the_named_counter() {
        let mut counters = InteractionCounters::default();
        counters.bump(InteractionKind::Copy);
        counters.bump(InteractionKind::Copy);
        counters.bump(InteractionKind::Export);
        assert_eq!(
            counters,
            InteractionCounters {
                views: 0,
                copies: 2,
                exports: 1
            }
        );
    }
}
