//! Line scanning.
//!
//! Full scans and incremental reparses both go through [`LineMatches`], so a line scanned from
//! the same column always yields the same matches. Incremental convergence relies on that.

use crate::engine::Match;
use crate::matcher::{PatternMatcher, RuleMatch};
use prettify_core::text::next_char_boundary;
use prettify_core::{ColumnIndex, Range};
use tracing::warn;

/// Lazy iterator over the matches of one line, starting at a UTF-16 column.
///
/// After a match, scanning resumes at the end of its ugly span. Unusable candidates are logged
/// and skipped; the cursor always advances by at least one char.
pub(crate) struct LineMatches<'a, M: ?Sized> {
    matcher: &'a M,
    text: &'a str,
    columns: ColumnIndex,
    line: usize,
    cursor: Option<usize>,
}

impl<'a, M: PatternMatcher + ?Sized> LineMatches<'a, M> {
    pub(crate) fn new(matcher: &'a M, line: usize, text: &'a str, from_column: usize) -> Self {
        let columns = ColumnIndex::new(text);
        let cursor = Some(columns.column_to_byte(from_column));
        Self {
            matcher,
            text,
            columns,
            line,
            cursor,
        }
    }

    fn is_usable(&self, at: usize, hit: &RuleMatch) -> bool {
        hit.rule < self.matcher.rule_count()
            && hit.ugly.start >= at
            && hit.ugly.start < hit.ugly.end
            && hit.ugly.end <= self.text.len()
            && self.text.is_char_boundary(hit.ugly.start)
            && self.text.is_char_boundary(hit.ugly.end)
    }

    /// Move past a skipped candidate: to `hint` when it is a valid boundary after `at`, otherwise
    /// one char forward.
    fn advance(&mut self, at: usize, hint: usize) {
        self.cursor = if hint > at && hint <= self.text.len() && self.text.is_char_boundary(hint) {
            Some(hint)
        } else {
            next_char_boundary(self.text, at)
        };
    }
}

impl<M: PatternMatcher + ?Sized> Iterator for LineMatches<'_, M> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            let at = self.cursor?;
            match self.matcher.find_at(self.text, at) {
                None => {
                    self.cursor = None;
                    return None;
                }
                Some(Err(err)) => {
                    warn!(line = self.line, %err, "skipping match candidate");
                    self.advance(at, err.resume_at);
                }
                Some(Ok(hit)) if self.is_usable(at, &hit) => {
                    self.cursor = Some(hit.ugly.end);
                    return Some(Match {
                        range: Range::on_line(
                            self.line,
                            self.columns.byte_to_column(hit.ugly.start),
                            self.columns.byte_to_column(hit.ugly.end),
                        ),
                        rule: hit.rule,
                    });
                }
                Some(Ok(hit)) => {
                    warn!(
                        line = self.line,
                        rule = hit.rule,
                        start = hit.ugly.start,
                        end = hit.ugly.end,
                        "skipping unusable match span"
                    );
                    self.advance(at, hit.ugly.start);
                }
            }
        }
    }
}
