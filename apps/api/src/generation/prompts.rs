// Wording of the AI enhancement request.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::compiler::compile;
use crate::llm_client::prompts::PLAIN_TEXT_ONLY;
use crate::models::prompt::PromptFields;

/// Enhancement template. Replace `{fields}`, `{optimize_instruction}` and
/// `{plain_text_only}` before sending.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"You are an expert prompt engineer. Rewrite the structured request below into a single, polished prompt for a generative AI model.

Keep every requirement the user gave (role, task, context, tone, format, constraints and any custom variables). Do not invent new requirements. Write in the second person, addressed to the model that will run the prompt.
{optimize_instruction}
--- STRUCTURED REQUEST ---
{fields}
--- END ---

{plain_text_only}"#;

/// Extra instruction used when the caller asked for an optimized prompt.
pub const OPTIMIZE_INSTRUCTION: &str = "\nAlso strengthen the prompt: make it specific, ask for a clear structure with headings where useful, and ask for actionable steps and concrete examples.\n";

/// Builds the one request sent to the remote client for these fields.
pub fn build_enhancement_prompt(fields: &PromptFields, optimize: bool) -> String {
    let optimize_instruction = if optimize { OPTIMIZE_INSTRUCTION } else { "" };

    ENHANCE_PROMPT_TEMPLATE
        .replace("{optimize_instruction}", optimize_instruction)
        .replace("{plain_text_only}", PLAIN_TEXT_ONLY)
        .replace("{fields}", &compile(fields, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PromptFields {
        PromptFields {
            role: Some("Poet".to_string()),
            task: Some("Write a poem".to_string()),
            tone: Some("Whimsical".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enhancement_prompt_embeds_compiled_fields() {
        let prompt = build_enhancement_prompt(&fields(), false);
        assert!(prompt.contains("You are a Poet. Write a poem\n\nTone: Whimsical"));
        assert!(prompt.contains(PLAIN_TEXT_ONLY));
        assert!(!prompt.contains('{'), "unfilled placeholder in: {prompt}");
    }

    #[test]
    fn test_enhancement_prompt_optimize_instruction_toggles() {
        assert!(!build_enhancement_prompt(&fields(), false).contains(OPTIMIZE_INSTRUCTION.trim()));
        assert!(build_enhancement_prompt(&fields(), true).contains(OPTIMIZE_INSTRUCTION.trim()));
    }
}
