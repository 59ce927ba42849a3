pub mod analytics;
pub mod prompt;
