//! Field Compiler: turns structured prompt fields into prompt text.
//!
//! Pure and deterministic. Sections are emitted in `SECTION_ORDER`; the role is
//! inlined before the task sentence and every later section becomes
//! `"\n\n{label}: {value}"`. Absent or blank fields are skipped entirely.

use std::fmt::Write;

use crate::models::prompt::{present, PromptFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Role,
    Task,
    Context,
    Tone,
    OutputFormat,
    Constraints,
    ResponseLength,
    Audience,
    Industry,
    Mood,
    Language,
    Complexity,
    CustomVariables,
}

/// The one ordering used when compiling fields into text.
pub const SECTION_ORDER: [Section; 13] = [
    Section::Role,
    Section::Task,
    Section::Context,
    Section::Tone,
    Section::OutputFormat,
    Section::Constraints,
    Section::ResponseLength,
    Section::Audience,
    Section::Industry,
    Section::Mood,
    Section::Language,
    Section::Complexity,
    Section::CustomVariables,
];

/// Generic quality directives appended by local optimization.
pub const OPTIMIZE_DIRECTIVES: &str = "Additional Instructions:\n\
- Be specific and detailed in your response\n\
- Use clear structure with headings where appropriate\n\
- Provide actionable steps or recommendations\n\
- Include relevant examples to illustrate key points";

impl Section {
    /// Section label. `compile` prints it for every section after the task; role
    /// and task are written inline without theirs.
    pub fn label(self) -> &'static str {
        match self {
            Section::Role => "Role",
            Section::Task => "Task",
            Section::Context => "Context",
            Section::Tone => "Tone",
            Section::OutputFormat => "Output Format",
            Section::Constraints => "Constraints",
            Section::ResponseLength => "Response Length",
            Section::Audience => "Target Audience",
            Section::Industry => "Industry",
            Section::Mood => "Mood",
            Section::Language => "Language",
            Section::Complexity => "Complexity Level",
            Section::CustomVariables => "Custom Variables",
        }
    }

    pub fn value(self, fields: &PromptFields) -> Option<&str> {
        let raw = match self {
            Section::Role => &fields.role,
            Section::Task => &fields.task,
            Section::Context => &fields.context,
            Section::Tone => &fields.tone,
            Section::OutputFormat => &fields.output_format,
            Section::Constraints => &fields.constraints,
            Section::ResponseLength => &fields.response_length,
            Section::Audience => &fields.audience,
            Section::Industry => &fields.industry,
            Section::Mood => &fields.mood,
            Section::Language => &fields.language,
            Section::Complexity => &fields.complexity,
            Section::CustomVariables => &fields.custom_variables,
        };
        present(raw)
    }
}

pub fn compile(fields: &PromptFields, optimize: bool) -> String {
    let mut prompt = String::new();

    for section in SECTION_ORDER {
        let Some(value) = section.value(fields) else {
            continue;
        };
        match section {
            Section::Role => {
                let _ = write!(prompt, "You are a {value}. ");
            }
            Section::Task => prompt.push_str(value),
            _ => {
                let _ = write!(prompt, "\n\n{}: {value}", section.label());
            }
        }
    }

    if optimize {
        prompt.push_str("\n\n");
        prompt.push_str(OPTIMIZE_DIRECTIVES);
    }

    prompt.trim().to_string()
}
