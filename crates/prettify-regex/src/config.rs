//! Substitution configuration.
//!
//! The configuration is JSON with camelCase keys. Missing keys take defaults and unknown keys
//! are ignored, so host settings files can carry extra entries.
//!
//! ```json
//! {
//!   "substitutions": [{ "ugly": "->", "pretty": "→", "pre": "\\s", "post": "\\s" }],
//!   "revealOn": "cursor",
//!   "adjustCursorMovement": false,
//!   "prettyCursor": "boxed"
//! }
//! ```

use crate::error::ConfigError;
use crate::rules::{PatternRule, RuleSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// When an ugly span is shown instead of its pretty form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealStrategy {
    /// The cursor touches the span (either boundary counts).
    #[default]
    Cursor,
    /// The cursor is strictly inside the span.
    CursorInner,
    /// The cursor is on the span's line.
    ActiveLine,
    /// The span intersects a selection.
    Selection,
    /// Never reveal.
    None,
}

/// How the cursor is drawn over a pretty form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrettyCursor {
    /// Draw the cursor as usual.
    None,
    /// Draw a box around the pretty form under the cursor.
    #[default]
    Boxed,
}

/// Substitution rules plus the display settings hosts read alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrettifyConfig {
    /// Substitution rules in priority order.
    pub substitutions: Vec<PatternRule>,
    /// When ugly text is revealed.
    pub reveal_on: RevealStrategy,
    /// Whether cursor movement should skip over pretty forms.
    pub adjust_cursor_movement: bool,
    /// Cursor style over pretty forms.
    pub pretty_cursor: PrettyCursor,
}

impl PrettifyConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Compile the substitutions. Invalid ones are logged and left out.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::compile(self.substitutions.iter().cloned())
    }
}
