// Shared prompt fragments for remote calls.
// Feature-specific wording lives in a prompts.rs next to the feature.

/// Appended to every remote request so the response can be returned verbatim.
pub const PLAIN_TEXT_ONLY: &str = "Respond with the final prompt text only. \
    Do NOT wrap it in quotes or markdown code fences. \
    Do NOT add a preamble, explanations or closing remarks.";
