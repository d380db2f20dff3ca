//! The engine only depends on the `PatternMatcher` capability, so it runs against a plain
//! substring matcher just as well as against compiled regexes.

use pretty_assertions::assert_eq;
use prettify_core::{Position, Range, RopeDocument, TextDocument, TextEdit};
use prettify_regex::{
    EngineOptions, Match, MatchEngine, MatchEvaluationError, PatternMatcher, RuleMatch,
};

/// Matches literal keywords. The leftmost occurrence wins, earlier keywords break ties.
struct Keywords(Vec<&'static str>);

impl PatternMatcher for Keywords {
    fn rule_count(&self) -> usize {
        self.0.len()
    }

    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(rule, keyword)| {
                haystack[start..]
                    .find(keyword)
                    .map(|pos| (start + pos, rule, keyword.len()))
            })
            .min_by_key(|&(pos, rule, _)| (pos, rule))
            .map(|(pos, rule, len)| {
                Ok(RuleMatch {
                    rule,
                    ugly: pos..pos + len,
                })
            })
    }
}

/// Fails on every candidate.
struct Broken;

impl PatternMatcher for Broken {
    fn rule_count(&self) -> usize {
        1
    }

    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>> {
        (start < haystack.len()).then(|| {
            Err(MatchEvaluationError {
                start,
                resume_at: start,
                reason: "broken matcher",
            })
        })
    }
}

/// Reports a rule index the engine does not know about.
struct OutOfRange;

impl PatternMatcher for OutOfRange {
    fn rule_count(&self) -> usize {
        1
    }

    fn find_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Option<Result<RuleMatch, MatchEvaluationError>> {
        (start < haystack.len()).then(|| {
            Ok(RuleMatch {
                rule: 7,
                ugly: start..start + 1,
            })
        })
    }
}

#[test]
fn test_engine_with_keyword_matcher() {
    let mut doc = RopeDocument::from_text("let x = lambda y: y\nlet z");
    let mut engine = MatchEngine::with_matcher(
        Keywords(vec!["lambda", "let"]),
        EngineOptions::default(),
    );
    engine.full_scan(&doc);

    assert_eq!(
        engine.matches_in(doc.full_range()),
        vec![
            Match {
                range: Range::on_line(0, 0, 3),
                rule: 1
            },
            Match {
                range: Range::on_line(0, 8, 14),
                rule: 0
            },
            Match {
                range: Range::on_line(1, 0, 3),
                rule: 1
            },
        ]
    );

    let edit = TextEdit::new(Range::on_line(0, 8, 14), "λ");
    doc.apply_edit(&edit);
    engine.apply_change(&doc, &[edit]);

    assert_eq!(
        engine.ranges(),
        &[Range::on_line(0, 0, 3), Range::on_line(1, 0, 3)]
    );
    assert_eq!(engine.rule_ranges(0), Some(&[][..]));
}

#[test]
fn test_evaluation_errors_never_reach_the_caller() {
    let mut doc = RopeDocument::from_text("abc\ndef");
    let mut engine = MatchEngine::with_matcher(Broken, EngineOptions::default());
    assert_eq!(engine.full_scan(&doc), 0);

    let edit = TextEdit::insert(Position::new(1, 1), "xyz");
    doc.apply_edit(&edit);
    let update = engine.apply_change(&doc, &[edit]);
    assert!(!update.changed());
    assert!(engine.ranges().is_empty());
}

#[test]
fn test_unknown_rule_is_skipped() {
    let doc = RopeDocument::from_text("abc");
    let mut engine = MatchEngine::with_matcher(OutOfRange, EngineOptions::default());
    assert_eq!(engine.full_scan(&doc), 0);
}
