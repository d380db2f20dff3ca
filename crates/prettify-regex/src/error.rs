//! Error types.

use thiserror::Error;

#[derive(Debug, Error)]
/// A substitution rule could not be turned into a usable pattern.
pub enum RuleError {
    #[error("regex compile error for pattern '{pattern}': {source}")]
    /// The assembled `pre(ugly)post` pattern (or one of its parts) failed to compile.
    InvalidPattern {
        /// The pattern string that failed.
        pattern: String,
        /// The regex compiler error.
        #[source]
        source: regex::Error,
    },

    #[error("pattern '{pattern}' matches the empty string")]
    /// The rule would match without consuming text and is rejected.
    MatchesEmpty {
        /// The assembled pattern string.
        pattern: String,
    },

    #[error("combined pattern failed to compile: {0}")]
    /// Every rule compiled on its own but their alternation did not (e.g. a duplicate group name).
    Combined(#[source] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not extract match span at byte {start}: {reason}")]
/// Extracting a single candidate match failed. The candidate is skipped.
pub struct MatchEvaluationError {
    /// Byte offset in the line where the failing candidate starts.
    pub start: usize,
    /// Byte offset scanning resumes from.
    pub resume_at: usize,
    /// Human readable cause.
    pub reason: &'static str,
}

#[derive(Debug, Error)]
/// Errors produced while loading a [`PrettifyConfig`](crate::PrettifyConfig).
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    /// The configuration is not valid JSON for the expected shape.
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Reading the configuration file failed.
    Io(#[from] std::io::Error),
}
