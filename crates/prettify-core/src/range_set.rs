//! Disjoint range set.
//!
//! An ordered collection of pairwise non-overlapping half-open [`Range`]s, kept sorted by start
//! position in a plain vector. Because the ranges are disjoint their ends are sorted as well, so
//! every query is a pair of binary searches followed by a contiguous slice.
//!
//! Touching ranges (`a.end == b.start`) are allowed and never merged.

use crate::delta::EditDelta;
use crate::position::{FindOptions, OverlapOptions, Position, Range};
use thiserror::Error;
use tracing::error;

/// An insertion would have overlapped a stored range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("range {inserted} overlaps stored range {existing}")]
pub struct OverlapError {
    /// The range that was being inserted.
    pub inserted: Range,
    /// The stored range it collides with.
    pub existing: Range,
}

/// Ordered set of disjoint ranges.
///
/// Query complexity: O(log n + k). Insertion: O(n) worst case (vector insert), O(log n) search.
/// Shifting: O(k) where k is the number of ranges behind the edit whose coordinates change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisjointRangeSet {
    /// Ranges sorted by `start`; ends are sorted too since no two ranges overlap.
    ranges: Vec<Range>,
}

impl DisjointRangeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Number of stored ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// All ranges in ascending order.
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Iterate ranges in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    /// End of the last range, if any.
    pub fn end(&self) -> Option<Position> {
        self.ranges.last().map(|r| r.end)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Check whether exactly `range` is stored.
    pub fn contains_range(&self, range: &Range) -> bool {
        self.ranges
            .binary_search_by(|r| r.start.cmp(&range.start))
            .is_ok_and(|idx| self.ranges[idx] == *range)
    }

    /// Insert a range, failing if it overlaps a stored range.
    pub fn try_insert(&mut self, range: Range) -> Result<(), OverlapError> {
        let idx = self.ranges.partition_point(|r| r.start < range.start);

        // Ends are sorted, so only the direct neighbours can collide.
        if let Some(prev) = idx.checked_sub(1).map(|i| self.ranges[i])
            && prev.end > range.start
        {
            return Err(OverlapError {
                inserted: range,
                existing: prev,
            });
        }
        if let Some(&next) = self.ranges.get(idx)
            && next.start < range.end
        {
            return Err(OverlapError {
                inserted: range,
                existing: next,
            });
        }

        self.ranges.insert(idx, range);
        Ok(())
    }

    /// Insert a range that must not overlap any stored range.
    ///
    /// Callers remove overlap first. A violation is a bug: it panics in debug builds; release
    /// builds log it and drop the stored ranges in the way so the set stays disjoint.
    pub fn insert(&mut self, range: Range) {
        let result = self.try_insert(range);
        debug_assert!(result.is_ok(), "inconsistent range index: {result:?}");
        if let Err(err) = result {
            error!(%err, "inconsistent range index, dropping overlapped ranges");
            let dropped = self.remove_overlapping(range, OverlapOptions::default());
            debug_assert!(!dropped.is_empty());
            let idx = self.ranges.partition_point(|r| r.start < range.start);
            self.ranges.insert(idx, range);
        }
    }

    /// Insert every range of `other`. Same precondition as [`insert`](Self::insert).
    ///
    /// When all of `other` falls into a single gap of `self` (the common case for one rescanned
    /// window) the ranges are spliced in with one vector operation.
    pub fn insert_ranges(&mut self, other: &DisjointRangeSet) {
        let (Some(first), Some(last)) = (other.ranges.first(), other.ranges.last()) else {
            return;
        };

        let idx = self.ranges.partition_point(|r| r.start < first.start);
        let fits_before = idx == 0 || self.ranges[idx - 1].end <= first.start;
        let fits_after = self
            .ranges
            .get(idx)
            .is_none_or(|next| next.start >= last.end);

        if fits_before && fits_after {
            self.ranges.splice(idx..idx, other.ranges.iter().copied());
        } else {
            for range in &other.ranges {
                self.insert(*range);
            }
        }
    }

    /// Index bounds `lo..hi` of the stored ranges overlapping `query`.
    fn overlap_bounds(&self, query: Range, options: OverlapOptions) -> (usize, usize) {
        let lo = if options.include_touching_start {
            self.ranges.partition_point(|r| r.end < query.start)
        } else {
            self.ranges.partition_point(|r| r.end <= query.start)
        };
        let hi = if options.include_touching_end {
            self.ranges.partition_point(|r| r.start <= query.end)
        } else {
            self.ranges.partition_point(|r| r.start < query.end)
        };
        (lo, hi.max(lo))
    }

    /// Remove and return every stored range overlapping `query` (see [`Range::overlaps`]).
    pub fn remove_overlapping(&mut self, query: Range, options: OverlapOptions) -> Vec<Range> {
        let (lo, hi) = self.overlap_bounds(query, options);
        self.ranges.drain(lo..hi).collect()
    }

    /// All stored ranges whose interiors intersect `query`.
    pub fn overlap(&self, query: Range) -> &[Range] {
        let (lo, hi) = self.overlap_bounds(query, OverlapOptions::default());
        &self.ranges[lo..hi]
    }

    /// The stored range containing `position`, honoring the boundary flags.
    ///
    /// If `position` is both the end of one range and the start of the next, the range starting
    /// there wins (unless `exclude_start` rules it out).
    pub fn find(&self, position: Position, options: FindOptions) -> Option<Range> {
        let idx = self.ranges.partition_point(|r| r.start <= position);
        // Only the last two candidates can contain `position`: the one starting at or before it,
        // and (with `include_end`) its predecessor ending exactly there.
        self.ranges[idx.saturating_sub(2)..idx]
            .iter()
            .rev()
            .find(|r| r.contains(position, options))
            .copied()
    }

    /// The closest stored range whose end is at or before `position`.
    pub fn find_preceding(&self, position: Position) -> Option<Range> {
        let idx = self.ranges.partition_point(|r| r.end <= position);
        idx.checked_sub(1).map(|i| self.ranges[i])
    }

    /// Ascending iterator over stored ranges with `start >= position`.
    ///
    /// The iterator is `Clone`, so a consumer can restart from any point it has reached.
    pub fn ranges_starting_at(&self, position: Position) -> std::slice::Iter<'_, Range> {
        let idx = self.ranges.partition_point(|r| r.start < position);
        self.ranges[idx..].iter()
    }

    /// Move every range behind the edit into post-edit coordinates.
    ///
    /// Ranges overlapping the replaced span must already have been removed with
    /// [`remove_overlapping`](Self::remove_overlapping). Returns how many ranges moved.
    pub fn shift_range_delta(&mut self, delta: &EditDelta) -> usize {
        let old = delta.old_range();
        let first = self.ranges.partition_point(|r| r.start < old.end);

        let mut keep = first;
        while keep > 0 && self.ranges[keep - 1].end > old.start {
            keep -= 1;
        }
        debug_assert_eq!(keep, first, "shifting ranges that overlap the edit {old}");
        if keep < first {
            error!(
                edit = %old,
                count = first - keep,
                "inconsistent range index, dropping ranges inside the edit"
            );
            self.ranges.drain(keep..first);
        }

        let new_end = delta.new_range().end;
        if new_end == old.end {
            return 0;
        }

        let same_lines = delta.line_delta() == 0;
        let mut moved = 0;
        for range in &mut self.ranges[keep..] {
            if same_lines && range.start.line > old.end.line {
                break;
            }
            range.start = delta.translate_after(range.start);
            range.end = delta.translate_after(range.end);
            moved += 1;
        }
        moved
    }
}

impl<'a> IntoIterator for &'a DisjointRangeSet {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl FromIterator<Range> for DisjointRangeSet {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.insert(range);
        }
        set
    }
}
