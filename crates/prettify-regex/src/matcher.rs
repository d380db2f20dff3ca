//! Pattern matching capability used by the match engine.
//!
//! The engine never talks to a regex library directly. It asks a [`PatternMatcher`] for the
//! leftmost match at or after a byte offset of one line and which rule produced it. [`RuleSet`]
//! is the regex-backed implementation; tests and hosts with other regex engines can supply
//! their own.
//!
//! [`RuleSet`]: crate::RuleSet

use crate::error::MatchEvaluationError;
use std::ops::Range as ByteRange;

/// One candidate match reported by a [`PatternMatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Index of the rule that fired (into the matcher's rule list).
    pub rule: usize,
    /// Byte span of the ugly text inside the haystack. Context consumed by pre/post patterns is
    /// not part of it.
    pub ugly: ByteRange<usize>,
}

/// "Exec from an index, report which rule fired" capability.
pub trait PatternMatcher {
    /// Number of rules the matcher can report.
    fn rule_count(&self) -> usize;

    /// Find the leftmost match whose search starts at byte offset `start` of `haystack`.
    ///
    /// `haystack` is always a complete line, so look-around assertions see the text before
    /// `start`. Returns `None` when nothing matches, and `Some(Err(_))` when a match was found but
    /// its span could not be attributed to a rule; the engine skips such candidates.
    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>>;
}

impl<M: PatternMatcher + ?Sized> PatternMatcher for &M {
    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }

    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>> {
        (**self).find_at(haystack, start)
    }
}
