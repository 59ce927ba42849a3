//! Metrics Extractor: word/char counts, keyword extraction and the complexity heuristic.
//!
//! The keyword and complexity constants are kept stable for compatibility with
//! previously stored prompts; they are a heuristic, not a measured property.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::prompt::{present, PromptFields};

pub const MAX_KEYWORDS: usize = 20;
/// Only the first N whitespace-delimited words of the task feed keyword extraction.
pub const TASK_KEYWORD_WORDS: usize = 50;
pub const MAX_COMPLEXITY: u8 = 10;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "so", "yet", "for", "of", "in", "on", "at",
    "to", "by", "with", "from", "as", "into", "is", "are", "was", "were", "be", "been", "being",
    "am", "have", "has", "had", "do", "does", "did", "will", "would", "shall", "should", "can",
    "could", "may", "might", "must", "this", "that", "these", "those", "it", "its",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeasure {
    pub word_count: usize,
    pub character_count: usize,
}

/// Counts whitespace-delimited words and characters of `content`.
pub fn measure(content: &str) -> ContentMeasure {
    ContentMeasure {
        word_count: content.split_whitespace().count(),
        character_count: content.chars().count(),
    }
}

/// Lower-cased keywords from role, the head of the task, and the industry/tone/format
/// descriptors. Deduplicated in first-occurrence order and capped at `MAX_KEYWORDS`.
pub fn keywords(fields: &PromptFields) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(role) = present(&fields.role) {
        candidates.extend(tokenize(role));
    }
    if let Some(task) = present(&fields.task) {
        for word in task.split_whitespace().take(TASK_KEYWORD_WORDS) {
            candidates.extend(tokenize(word));
        }
    }
    // Descriptors are short labels ("Marketing", "Bullet list") and count as one keyword each.
    for descriptor in [&fields.industry, &fields.tone, &fields.output_format] {
        if let Some(value) = present(descriptor) {
            candidates.push(value.to_lowercase());
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .filter(|word| seen.insert(word.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// Additive complexity heuristic mapped onto an integer in `0..=10`.
pub fn complexity_score(fields: &PromptFields) -> u8 {
    let mut score = 0.0_f64;

    if present(&fields.task).is_some() {
        score += 1.0;
    }
    if present(&fields.role).is_some() {
        score += 0.5;
    }
    if present(&fields.context).is_some() {
        score += 1.0;
    }
    if present(&fields.constraints).is_some() {
        score += 1.0;
    }
    if present(&fields.custom_variables).is_some() {
        score += 1.5;
    }

    let combined_len: usize = [&fields.task, &fields.context, &fields.constraints]
        .into_iter()
        .filter_map(present)
        .map(|v| v.chars().count())
        .sum();
    if combined_len > 500 {
        score += 1.0;
    }
    if combined_len > 1000 {
        score += 1.0;
    }

    ((score * 2.0).round() as u8).min(MAX_COMPLEXITY)
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
