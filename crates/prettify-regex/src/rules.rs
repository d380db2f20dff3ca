//! Substitution rules and the combined scan pattern.
//!
//! Every rule is an `ugly` pattern with optional `pre`/`post` context patterns. A rule compiles
//! to `(?:pre)(ugly)(?:post)`; the capture group around `ugly` marks the span that gets
//! replaced. All valid rules are then joined into one alternation so a line is scanned in a
//! single pass.
//!
//! Capture groups of the alternation are laid out rule after rule. While assembling it we record
//! where each rule's block of groups starts and which group is its `ugly` group, so the rule that
//! fired is recovered from the first participating group rather than by guessing.

use crate::error::{MatchEvaluationError, RuleError};
use crate::matcher::{PatternMatcher, RuleMatch};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A single pretty substitution: text matching `ugly` is displayed as `pretty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Regex for the text that gets replaced.
    pub ugly: String,
    /// Display form rendered in place of the ugly text.
    pub pretty: String,
    /// Regex that must match directly before `ugly`. Not part of the replaced span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
    /// Regex that must match directly after `ugly`. Not part of the replaced span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
}

impl PatternRule {
    /// Rule replacing `ugly` with `pretty`, without context patterns.
    pub fn new(ugly: impl Into<String>, pretty: impl Into<String>) -> Self {
        Self {
            ugly: ugly.into(),
            pretty: pretty.into(),
            pre: None,
            post: None,
        }
    }

    /// Require `pre` to match right before the ugly text.
    pub fn with_pre(mut self, pre: impl Into<String>) -> Self {
        self.pre = Some(pre.into());
        self
    }

    /// Require `post` to match right after the ugly text.
    pub fn with_post(mut self, post: impl Into<String>) -> Self {
        self.post = Some(post.into());
        self
    }

    /// The assembled `(?:pre)(ugly)(?:post)` pattern.
    pub fn pattern(&self) -> String {
        let mut pattern = String::new();
        if let Some(pre) = &self.pre {
            pattern.push_str(&format!("(?:{pre})"));
        }
        pattern.push_str(&format!("({})", self.ugly));
        if let Some(post) = &self.post {
            pattern.push_str(&format!("(?:{post})"));
        }
        pattern
    }

    /// Compile this rule on its own.
    pub fn compile(&self) -> Result<CompiledRule, RuleError> {
        let pattern = self.pattern();
        let regex = Regex::new(&pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        if regex.is_match("") {
            return Err(RuleError::MatchesEmpty { pattern });
        }

        // Groups inside `pre` come before the ugly group.
        let pre_groups = match &self.pre {
            Some(pre) => {
                Regex::new(pre)
                    .map_err(|source| RuleError::InvalidPattern {
                        pattern: pre.clone(),
                        source,
                    })?
                    .captures_len()
                    - 1
            }
            None => 0,
        };

        Ok(CompiledRule {
            rule: self.clone(),
            group_count: regex.captures_len() - 1,
            ugly_group: pre_groups + 1,
            regex,
            source_index: 0,
        })
    }
}

/// A rule that compiled successfully.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: PatternRule,
    regex: Regex,
    /// Number of capture groups (excluding group 0) in `regex`.
    group_count: usize,
    /// Index of the ugly group inside `regex`.
    ugly_group: usize,
    /// Position of the rule in the list it was compiled from.
    source_index: usize,
}

impl CompiledRule {
    /// The rule as configured.
    pub fn rule(&self) -> &PatternRule {
        &self.rule
    }

    /// The rule's own `(?:pre)(ugly)(?:post)` regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The pretty display form.
    pub fn pretty(&self) -> &str {
        &self.rule.pretty
    }

    /// Position of the rule in the input list, counting rules that were rejected.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Byte span of the ugly text in the leftmost match of this rule alone.
    pub fn find_ugly(&self, haystack: &str) -> Option<std::ops::Range<usize>> {
        let caps = self.regex.captures(haystack)?;
        caps.get(self.ugly_group).map(|m| m.range())
    }
}

#[derive(Debug, Clone)]
struct CombinedPattern {
    regex: Regex,
    /// Absolute index of the first capture group of each rule. Ascending, starts at 1.
    group_starts: Vec<usize>,
    /// Absolute index of each rule's ugly group.
    ugly_groups: Vec<usize>,
}

impl CombinedPattern {
    fn build(rules: &[CompiledRule]) -> Result<Option<Self>, RuleError> {
        if rules.is_empty() {
            return Ok(None);
        }

        let mut alternatives = Vec::with_capacity(rules.len());
        let mut group_starts = Vec::with_capacity(rules.len());
        let mut ugly_groups = Vec::with_capacity(rules.len());
        let mut next_group = 1;

        for rule in rules {
            alternatives.push(format!("(?:{})", rule.regex.as_str()));
            group_starts.push(next_group);
            ugly_groups.push(next_group + rule.ugly_group - 1);
            next_group += rule.group_count;
        }

        let regex = Regex::new(&alternatives.join("|")).map_err(RuleError::Combined)?;
        debug_assert_eq!(regex.captures_len(), next_group);

        Ok(Some(Self {
            regex,
            group_starts,
            ugly_groups,
        }))
    }

    /// Add rules one at a time, dropping each one the alternation rejects (e.g. a group name
    /// already used by an earlier rule).
    fn build_each(rules: Vec<CompiledRule>) -> (Vec<CompiledRule>, Option<Self>) {
        let mut kept: Vec<CompiledRule> = Vec::with_capacity(rules.len());
        let mut combined = None;
        for rule in rules {
            kept.push(rule);
            match Self::build(&kept) {
                Ok(built) => combined = built,
                Err(err) => {
                    if let Some(rule) = kept.pop() {
                        warn!(
                            %err,
                            ugly = %rule.rule.ugly,
                            pretty = %rule.rule.pretty,
                            "substitution ignored"
                        );
                    }
                }
            }
        }
        (kept, combined)
    }

    fn rule_match(&self, caps: &Captures<'_>) -> Result<RuleMatch, MatchEvaluationError> {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let fail = |reason| MatchEvaluationError {
            start: whole.start,
            resume_at: whole.end,
            reason,
        };

        // Only the alternative that matched has participating groups.
        let first = (1..caps.len())
            .find(|&group| caps.get(group).is_some())
            .ok_or_else(|| fail("no rule group participated"))?;
        let rule = self
            .group_starts
            .partition_point(|&start| start <= first)
            .checked_sub(1)
            .ok_or_else(|| fail("capture group precedes every rule"))?;
        let ugly = caps
            .get(self.ugly_groups[rule])
            .ok_or_else(|| fail("ugly group did not participate"))?;

        Ok(RuleMatch {
            rule,
            ugly: ugly.range(),
        })
    }
}

/// The compiled, valid subset of a rule list plus their combined alternation.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    combined: Option<CombinedPattern>,
}

impl RuleSet {
    /// Compile `rules`. Invalid rules are logged and dropped; the rest stay in order.
    pub fn compile(rules: impl IntoIterator<Item = PatternRule>) -> Self {
        let mut compiled = Vec::new();
        for (source_index, rule) in rules.into_iter().enumerate() {
            match rule.compile() {
                Ok(mut valid) => {
                    valid.source_index = source_index;
                    compiled.push(valid);
                }
                Err(err) => {
                    warn!(
                        %err,
                        ugly = %rule.ugly,
                        pretty = %rule.pretty,
                        "substitution ignored"
                    );
                }
            }
        }

        let combined = match CombinedPattern::build(&compiled) {
            Ok(combined) => combined,
            Err(err) => {
                warn!(%err, rules = compiled.len(), "rebuilding combined pattern rule by rule");
                let (kept, combined) = CombinedPattern::build_each(compiled);
                compiled = kept;
                combined
            }
        };
        debug!(rules = compiled.len(), "compiled substitution rules");

        Self {
            rules: compiled,
            combined,
        }
    }

    /// Number of valid rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rule survived compilation.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Valid rule `index`.
    pub fn rule(&self, index: usize) -> Option<&CompiledRule> {
        self.rules.get(index)
    }

    /// Iterate valid rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }

    /// The combined alternation, if any rule is valid.
    pub fn combined_pattern(&self) -> Option<&str> {
        self.combined.as_ref().map(|c| c.regex.as_str())
    }
}

impl PatternMatcher for RuleSet {
    fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>> {
        let combined = self.combined.as_ref()?;
        let caps = combined.regex.captures_at(haystack, start)?;
        Some(combined.rule_match(&caps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_assembly() {
        let rule = PatternRule::new("->", "→").with_pre(r"\s").with_post(r"\s");
        assert_eq!(rule.pattern(), r"(?:\s)(->)(?:\s)");
        assert_eq!(PatternRule::new("lambda", "λ").pattern(), "(lambda)");
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        let err = PatternRule::new("(unclosed", "x").compile().unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_matching_rule_is_rejected() {
        let err = PatternRule::new("a*", "x").compile().unwrap_err();
        assert!(matches!(err, RuleError::MatchesEmpty { .. }));
    }

    #[test]
    fn test_rule_set_drops_invalid_rules() {
        let set = RuleSet::compile([
            PatternRule::new("->", "→"),
            PatternRule::new("[", "?"),
            PatternRule::new("<=", "≤"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rule(1).map(|r| r.pretty()), Some("≤"));
        assert_eq!(set.rule(1).map(|r| r.source_index()), Some(2));
    }

    #[test]
    fn test_rule_set_drops_rules_conflicting_in_alternation() {
        // Each rule is fine alone, but one regex cannot define the group name twice.
        let set = RuleSet::compile([
            PatternRule::new("(?P<op>->)", "→"),
            PatternRule::new("(?P<op><=)", "≤"),
            PatternRule::new("lambda", "λ"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rule_count(), 2);
        assert_eq!(set.rule(0).map(|r| r.source_index()), Some(0));
        assert_eq!(set.rule(1).map(|r| r.source_index()), Some(2));
        assert!(set.combined_pattern().is_some());

        let text = "a -> b <= lambda";
        assert_eq!(
            set.find_at(text, 0).unwrap().unwrap(),
            RuleMatch { rule: 0, ugly: 2..4 }
        );
        assert_eq!(
            set.find_at(text, 4).unwrap().unwrap(),
            RuleMatch { rule: 1, ugly: 10..16 }
        );
    }

    #[test]
    fn test_group_layout_with_user_groups() {
        // Rule 0 has a group in `pre` and one inside `ugly`; rule 1 has a group in `post`.
        let set = RuleSet::compile([
            PatternRule::new("(f)oo", "F").with_pre("(x|y)"),
            PatternRule::new("bar", "B").with_post("(!)"),
            PatternRule::new("baz", "Z"),
        ]);
        let combined = set.combined.as_ref().unwrap();
        assert_eq!(combined.group_starts, vec![1, 4, 6]);
        assert_eq!(combined.ugly_groups, vec![2, 4, 6]);

        let hit = set.find_at("..yfoo bar! baz", 0).unwrap().unwrap();
        assert_eq!(hit, RuleMatch { rule: 0, ugly: 3..6 });

        let hit = set.find_at("..yfoo bar! baz", 6).unwrap().unwrap();
        assert_eq!(hit, RuleMatch { rule: 1, ugly: 7..10 });

        let hit = set.find_at("..yfoo bar! baz", 10).unwrap().unwrap();
        assert_eq!(hit, RuleMatch { rule: 2, ugly: 12..15 });

        assert!(set.find_at("..yfoo bar! baz", 15).is_none());
    }

    #[test]
    fn test_find_at_sees_text_before_start() {
        let set = RuleSet::compile([PatternRule::new(r"\bin\b", "∈")]);
        // "in" inside "win" must not match even when the search starts at the 'i'.
        assert!(set.find_at("win", 1).is_none());
        assert_eq!(
            set.find_at("x in y", 1).unwrap().unwrap(),
            RuleMatch { rule: 0, ugly: 2..4 }
        );
    }

    #[test]
    fn test_compiled_rule_find_ugly() {
        let rule = PatternRule::new("->", "→").with_pre(" ").compile().unwrap();
        assert_eq!(rule.find_ugly("a -> b"), Some(2..4));
        assert_eq!(rule.find_ugly("a->b"), None);
    }
}
