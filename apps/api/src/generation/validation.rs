//! Validation Gate: field presence and length checks run before any generation.
//!
//! Every rule is evaluated; errors are collected rather than short-circuited so the
//! UI can highlight all offending fields at once.

use serde::Serialize;
use thiserror::Error;

use crate::models::prompt::{present, PromptFields};

pub const TASK_MAX_CHARS: usize = 1000;
pub const CONTEXT_MAX_CHARS: usize = 2000;
pub const CONSTRAINTS_MAX_CHARS: usize = 500;
pub const CUSTOM_VARIABLES_MAX_CHARS: usize = 1000;
/// Bound for the short descriptor fields (role, tone, audience, ...).
pub const DESCRIPTOR_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Caller input violated one or more field rules. Never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid prompt fields: {}", errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

pub fn validate_fields(fields: &PromptFields) -> ValidationReport {
    let mut errors = Vec::new();

    match present(&fields.task) {
        None => errors.push("Task is required".to_string()),
        Some(task) => check_max(&mut errors, "Task", task, TASK_MAX_CHARS),
    }

    let long_fields = [
        ("Context", &fields.context, CONTEXT_MAX_CHARS),
        ("Constraints", &fields.constraints, CONSTRAINTS_MAX_CHARS),
        (
            "Custom variables",
            &fields.custom_variables,
            CUSTOM_VARIABLES_MAX_CHARS,
        ),
    ];
    for (label, value, max) in long_fields {
        if let Some(value) = present(value) {
            check_max(&mut errors, label, value, max);
        }
    }

    let descriptors = [
        ("Role", &fields.role),
        ("Tone", &fields.tone),
        ("Output format", &fields.output_format),
        ("Response length", &fields.response_length),
        ("Audience", &fields.audience),
        ("Industry", &fields.industry),
        ("Mood", &fields.mood),
        ("Language", &fields.language),
        ("Complexity", &fields.complexity),
    ];
    for (label, value) in descriptors {
        if let Some(value) = present(value) {
            check_max(&mut errors, label, value, DESCRIPTOR_MAX_CHARS);
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_max(errors: &mut Vec<String>, label: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(format!("{label} must be {max} characters or fewer"));
    }
}
