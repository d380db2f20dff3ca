#![warn(missing_docs)]
//! Prettify Regex - incremental pretty-substitution matching
//!
//! This crate scans a document with a family of substitution rules ("show `->` as `→`") and
//! keeps the resulting match index consistent while the document is edited, without re-scanning
//! the whole buffer on every keystroke.
//!
//! - [`PatternRule`] / [`RuleSet`]: rules and their combined alternation
//! - [`PatternMatcher`]: the matching capability the engine is written against
//! - [`MatchEngine`]: per-rule and aggregate indices, full and incremental scanning
//! - [`RedrawScheduler`]: leading-edge debounce for decoration redraws
//! - [`PrettifyConfig`]: JSON configuration
//!
//! # Example
//!
//! ```rust
//! use prettify_core::{Position, Range, RopeDocument, TextEdit};
//! use prettify_regex::{MatchEngine, PatternRule, RuleSet};
//!
//! let mut doc = RopeDocument::from_text("a -> b");
//! let mut engine = MatchEngine::new(RuleSet::compile([PatternRule::new("->", "→")]));
//! engine.full_scan(&doc);
//! assert_eq!(engine.ranges(), &[Range::on_line(0, 2, 4)]);
//!
//! let edit = TextEdit::insert(Position::new(0, 0), "x");
//! doc.apply_edit(&edit);
//! engine.apply_change(&doc, &[edit]);
//! assert_eq!(engine.ranges(), &[Range::on_line(0, 3, 5)]);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod redraw;
pub mod rules;
mod scan;

pub use config::{PrettifyConfig, PrettyCursor, RevealStrategy};
pub use engine::{EngineOptions, IndexUpdate, Match, MatchEngine, ScanResume};
pub use error::{ConfigError, MatchEvaluationError, RuleError};
pub use matcher::{PatternMatcher, RuleMatch};
pub use redraw::{RedrawIntervals, RedrawRequest, RedrawScheduler, ScheduledRedraw, ViewFocus};
pub use rules::{CompiledRule, PatternRule, RuleSet};
