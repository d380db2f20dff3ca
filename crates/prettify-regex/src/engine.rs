//! Incremental match engine.
//!
//! [`MatchEngine`] keeps one [`DisjointRangeSet`] per rule plus an aggregate set of every ugly
//! span, and keeps them equal to what a full scan of the current document would produce.
//!
//! On a change notification every edit is folded in order: ranges overlapping the replaced span
//! are dropped, the survivors are shifted into post-edit coordinates, and the span the new text
//! occupies is remembered as dirty. Dirty windows are then re-scanned line by line. On the last
//! line of a window scanning stops as soon as it reproduces a pre-existing match behind the
//! edit, because the rest of the line is unchanged and scans identically.

use crate::matcher::PatternMatcher;
use crate::redraw::{RedrawIntervals, RedrawRequest, RedrawScheduler, ViewFocus};
use crate::rules::RuleSet;
use crate::scan::LineMatches;
use prettify_core::{
    DisjointRangeSet, EditDelta, FindOptions, OverlapOptions, Position, Range, TextDocument,
    TextEdit,
};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, trace};

/// Where an incremental reparse starts scanning on the first line of a dirty window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanResume {
    /// Rescan the first line from column 0. Always equivalent to a full scan.
    #[default]
    LineStart,
    /// Resume at the end of the closest match that ends on the same line at or before the edit.
    ///
    /// Saves work on long lines, but is only exact when no rule can extend a match that ends
    /// right before the edit (e.g. `foo(bar)?` followed by typing `bar`).
    AfterPrecedingMatch,
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Where incremental reparses start on the first dirty line.
    pub resume: ScanResume,
    /// Debounce intervals for decoration redraws.
    pub redraw: RedrawIntervals,
}

/// An ugly span and the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// The ugly span.
    pub range: Range,
    /// Index of the rule in the engine's matcher.
    pub rule: usize,
}

/// Summary of what one change notification did to the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexUpdate {
    /// Windows that were re-scanned, in document order.
    pub rescanned: Vec<Range>,
    /// Matches dropped from the index.
    pub removed: usize,
    /// Matches inserted into the index.
    pub added: usize,
    /// Whether any surviving match changed position.
    pub moved: bool,
}

impl IndexUpdate {
    /// Check if renderers have anything to update.
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.added > 0 || self.moved
    }
}

struct Reparse {
    scanned: Range,
    removed: usize,
    added: usize,
}

/// Incrementally maintained match index for one document.
#[derive(Debug)]
pub struct MatchEngine<M = RuleSet> {
    matcher: M,
    options: EngineOptions,
    aggregate: DisjointRangeSet,
    by_rule: Vec<DisjointRangeSet>,
    redraw: RedrawScheduler,
}

impl MatchEngine<RuleSet> {
    /// Engine over a compiled rule set with default options.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_matcher(rules, EngineOptions::default())
    }
}

impl<M: PatternMatcher> MatchEngine<M> {
    /// Engine over any matcher. The index starts empty; call [`full_scan`](Self::full_scan).
    pub fn with_matcher(matcher: M, options: EngineOptions) -> Self {
        let by_rule = (0..matcher.rule_count())
            .map(|_| DisjointRangeSet::new())
            .collect();
        Self {
            matcher,
            options,
            aggregate: DisjointRangeSet::new(),
            by_rule,
            redraw: RedrawScheduler::new(options.redraw),
        }
    }

    /// The matcher the index was built with.
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Options the engine was created with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Swap in a new matcher (e.g. after a configuration reload) and rebuild the index.
    pub fn replace_matcher<D>(&mut self, matcher: M, document: &D) -> usize
    where
        D: TextDocument + ?Sized,
    {
        self.by_rule = (0..matcher.rule_count())
            .map(|_| DisjointRangeSet::new())
            .collect();
        self.matcher = matcher;
        self.refresh(document)
    }

    /// Clear the index and scan the whole document. Returns the number of matches.
    pub fn full_scan<D>(&mut self, document: &D) -> usize
    where
        D: TextDocument + ?Sized,
    {
        let started = Instant::now();
        self.aggregate.clear();
        for set in &mut self.by_rule {
            set.clear();
        }
        self.full_scan_lines(document, 0..document.line_count());
        debug!(
            lines = document.line_count(),
            matches = self.aggregate.len(),
            elapsed = ?started.elapsed(),
            "full scan"
        );
        self.aggregate.len()
    }

    /// Re-scan whole `lines`, replacing whatever the index held for them.
    ///
    /// Lets hosts split a full scan into batches. Returns the number of matches found.
    pub fn full_scan_lines<D>(&mut self, document: &D, lines: std::ops::Range<usize>) -> usize
    where
        D: TextDocument + ?Sized,
    {
        let line_count = document.line_count();
        let lines = lines.start.min(line_count)..lines.end.min(line_count);
        if lines.is_empty() {
            return 0;
        }

        let window = Range::new(
            Position::line_start(lines.start),
            Position::line_start(lines.end),
        );
        self.remove_window(window);

        let mut found = 0;
        for line in lines {
            let Some(text) = document.line_text(line) else {
                break;
            };
            let fresh: Vec<Match> = LineMatches::new(&self.matcher, line, &text, 0).collect();
            found += fresh.len();
            for m in fresh {
                self.insert_match(m);
            }
        }
        found
    }

    /// Full re-scan that also schedules a redraw. Returns the number of matches.
    pub fn refresh<D>(&mut self, document: &D) -> usize
    where
        D: TextDocument + ?Sized,
    {
        let count = self.full_scan(document);
        self.redraw.mark_dirty();
        count
    }

    /// Re-scan the region affected by an edit whose new text occupies `edit_range`.
    ///
    /// The index must already have been shifted for the edit (see
    /// [`apply_change`](Self::apply_change)). Returns the range actually re-scanned.
    pub fn incremental_reparse<D>(&mut self, document: &D, edit_range: Range) -> Range
    where
        D: TextDocument + ?Sized,
    {
        let result = self.reparse(document, edit_range);
        if result.removed > 0 || result.added > 0 {
            self.redraw.mark_dirty();
        }
        result.scanned
    }

    /// Bring the index up to date with one change notification.
    ///
    /// `edits` are in host order, each in coordinates after the previous ones; `document` is the
    /// buffer after all of them.
    pub fn apply_change<D>(&mut self, document: &D, edits: &[TextEdit]) -> IndexUpdate
    where
        D: TextDocument + ?Sized,
    {
        let mut update = IndexUpdate::default();
        let mut dirty: Vec<Range> = Vec::with_capacity(edits.len());

        for edit in edits {
            let delta = EditDelta::from_edit(edit);
            if delta.is_noop() {
                continue;
            }

            update.removed += self.remove_window(delta.old_range()).len();
            update.moved |= self.shift(&delta) > 0;

            for window in &mut dirty {
                *window = delta.map_range(*window);
            }
            dirty.push(delta.new_range());
        }

        for window in merge_line_windows(dirty) {
            let result = self.reparse(document, window);
            update.removed += result.removed;
            update.added += result.added;
            update.rescanned.push(result.scanned);
        }

        trace!(
            target: "prettify.engine",
            edits = edits.len(),
            windows = update.rescanned.len(),
            removed = update.removed,
            added = update.added,
            moved = update.moved,
            "apply_change"
        );
        if update.changed() {
            self.redraw.mark_dirty();
        }
        update
    }

    fn reparse<D>(&mut self, document: &D, edit_range: Range) -> Reparse
    where
        D: TextDocument + ?Sized,
    {
        let edit_range = document.clamp_range(edit_range);
        let first_line = edit_range.start.line;
        let last_line = edit_range.end.line;
        let scan_start = self.scan_start(edit_range.start);

        let mut fresh = Vec::new();
        for line in first_line..last_line {
            let from = if line == first_line {
                scan_start.column
            } else {
                0
            };
            if let Some(text) = document.line_text(line) {
                fresh.extend(LineMatches::new(&self.matcher, line, &text, from));
            }
        }

        let text = document.line_text(last_line).unwrap_or_default();
        let from = if first_line == last_line {
            scan_start.column
        } else {
            0
        };
        // Without convergence the window runs to the next line start, so matches over text the
        // document no longer reports as part of the line (a hidden terminator) are dropped too.
        let mut window_end = Position::line_start(last_line + 1);

        // Pre-existing matches behind the edit on its last line are still valid scan output of the
        // unchanged suffix. Reproducing one of them means the rest of the line is unchanged too.
        let mut existing = self
            .aggregate
            .ranges_starting_at(edit_range.end)
            .take_while(|r| r.start.line == last_line)
            .peekable();
        for m in LineMatches::new(&self.matcher, last_line, &text, from) {
            while existing.next_if(|r| r.start < m.range.start).is_some() {}
            if existing.peek().is_some_and(|r| **r == m.range)
                && self.by_rule[m.rule].contains_range(&m.range)
            {
                window_end = m.range.start;
                break;
            }
            fresh.push(m);
        }

        let scanned = Range::new(scan_start, window_end);
        let mut removed = if scanned.is_empty() {
            Vec::new()
        } else {
            self.remove_window(scanned)
        };
        removed.sort_by_key(|m| m.range.start);
        let unchanged = count_common(&removed, &fresh);

        for m in &fresh {
            self.insert_match(*m);
        }

        trace!(
            target: "prettify.engine",
            %edit_range,
            %scanned,
            removed = removed.len(),
            fresh = fresh.len(),
            unchanged,
            "reparse"
        );
        Reparse {
            scanned,
            removed: removed.len() - unchanged,
            added: fresh.len() - unchanged,
        }
    }

    fn scan_start(&self, position: Position) -> Position {
        let line_start = Position::line_start(position.line);
        match self.options.resume {
            ScanResume::LineStart => line_start,
            ScanResume::AfterPrecedingMatch => self
                .aggregate
                .find_preceding(position)
                .filter(|r| r.end.line == position.line)
                .map_or(line_start, |r| r.end),
        }
    }

    fn insert_match(&mut self, m: Match) {
        self.aggregate.insert(m.range);
        self.by_rule[m.rule].insert(m.range);
    }

    /// Remove every match whose interior intersects `window` from all sets.
    fn remove_window(&mut self, window: Range) -> Vec<Match> {
        self.aggregate
            .remove_overlapping(window, OverlapOptions::default());
        let mut removed = Vec::new();
        for (rule, set) in self.by_rule.iter_mut().enumerate() {
            removed.extend(
                set.remove_overlapping(window, OverlapOptions::default())
                    .into_iter()
                    .map(|range| Match { range, rule }),
            );
        }
        removed
    }

    fn shift(&mut self, delta: &EditDelta) -> usize {
        let moved = self.aggregate.shift_range_delta(delta);
        for set in &mut self.by_rule {
            set.shift_range_delta(delta);
        }
        moved
    }

    /// Every ugly span, sorted.
    pub fn ranges(&self) -> &[Range] {
        self.aggregate.ranges()
    }

    /// Ugly spans produced by `rule`.
    pub fn rule_ranges(&self, rule: usize) -> Option<&[Range]> {
        self.by_rule.get(rule).map(DisjointRangeSet::ranges)
    }

    /// The aggregate index.
    pub fn aggregate(&self) -> &DisjointRangeSet {
        &self.aggregate
    }

    /// The index of `rule`.
    pub fn rule_index(&self, rule: usize) -> Option<&DisjointRangeSet> {
        self.by_rule.get(rule)
    }

    /// The ugly span containing `position`.
    pub fn find(&self, position: Position, options: FindOptions) -> Option<Range> {
        self.aggregate.find(position, options)
    }

    /// Ugly spans intersecting `range`.
    pub fn overlap(&self, range: Range) -> &[Range] {
        self.aggregate.overlap(range)
    }

    /// Rule that produced the stored span `range`.
    pub fn rule_of(&self, range: Range) -> Option<usize> {
        self.by_rule
            .iter()
            .position(|set| set.contains_range(&range))
    }

    /// The match containing `position`, with its rule.
    pub fn match_at(&self, position: Position, options: FindOptions) -> Option<Match> {
        let range = self.find(position, options)?;
        let rule = self.rule_of(range)?;
        Some(Match { range, rule })
    }

    /// Matches intersecting `range` in document order, e.g. for a renderer's viewport.
    pub fn matches_in(&self, range: Range) -> Vec<Match> {
        let mut matches: Vec<Match> = self
            .by_rule
            .iter()
            .enumerate()
            .flat_map(|(rule, set)| {
                set.overlap(range)
                    .iter()
                    .map(move |&range| Match { range, rule })
            })
            .collect();
        matches.sort_by_key(|m| m.range.start);
        matches
    }

    /// Ask whether views of kind `focus` should redraw their decorations at `now`.
    pub fn poll_redraw(&mut self, now: Instant, focus: ViewFocus) -> Option<RedrawRequest> {
        self.redraw.poll(now, focus)
    }

    /// When a coalesced redraw becomes due, if one is pending.
    pub fn next_redraw_deadline(&self) -> Option<Instant> {
        self.redraw.next_deadline()
    }

    /// Redraw state, for hosts that drive their own timers.
    pub fn redraw_scheduler(&self) -> &RedrawScheduler {
        &self.redraw
    }

    /// Cancel pending redraws and release the index.
    pub fn dispose(mut self) {
        self.redraw.cancel_all();
        debug!(matches = self.aggregate.len(), "match engine disposed");
    }
}

/// Sort dirty windows and merge the ones sharing a line, so each line is re-scanned once.
fn merge_line_windows(mut windows: Vec<Range>) -> Vec<Range> {
    windows.sort_by_key(|w| w.start);
    let mut merged: Vec<Range> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start.line <= last.end.line => *last = last.union(&window),
            _ => merged.push(window),
        }
    }
    merged
}

/// Number of matches present in both lists. Both are sorted by start and disjoint.
fn count_common(a: &[Match], b: &[Match]) -> usize {
    let (mut i, mut j, mut common) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].range.start.cmp(&b[j].range.start) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                if a[i] == b[j] {
                    common += 1;
                }
                i += 1;
                j += 1;
            }
        }
    }
    common
}
