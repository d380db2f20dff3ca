//! Buffer positions and half-open ranges.
//!
//! Positions are `(line, column)` pairs where `column` counts **UTF-16 code units** within the
//! line, matching the coordinate system most editor hosts report edits in.

use std::cmp::Ordering;
use std::fmt;

/// A `(line, column)` position in a document.
///
/// Ordering compares `line` first, then `column`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (0-based).
    pub line: usize,
    /// Column in UTF-16 code units (0-based).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first column of `line`.
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span `[start, end)` of positions. May cover several lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

/// Boundary handling for overlap queries.
///
/// By default only ranges whose interiors intersect the query count as overlapping. The flags
/// additionally accept ranges that merely touch the query at its start or end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapOptions {
    /// Also accept ranges whose `end` equals the query's `start`.
    pub include_touching_start: bool,
    /// Also accept ranges whose `start` equals the query's `end`.
    pub include_touching_end: bool,
}

impl OverlapOptions {
    /// Accept ranges touching the query on either side.
    pub const TOUCHING: Self = Self {
        include_touching_start: true,
        include_touching_end: true,
    };
}

/// Boundary handling for point lookups.
///
/// By default a range `[start, end)` contains `start` but not `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Do not treat `start` as contained.
    pub exclude_start: bool,
    /// Treat `end` as contained.
    pub include_end: bool,
}

impl Range {
    /// Create a range. The endpoints are swapped if given in reverse order.
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Shorthand for a range given as `(line, column)` pairs.
    pub fn from_coords(start: (usize, usize), end: (usize, usize)) -> Self {
        Self::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
    }

    /// A single-line range on `line` covering columns `start..end`.
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    /// An empty range at `position`.
    pub const fn empty(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the range starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Check whether `position` lies inside the range, honoring the boundary flags.
    pub fn contains(&self, position: Position, options: FindOptions) -> bool {
        let after_start = match self.start.cmp(&position) {
            Ordering::Less => true,
            Ordering::Equal => !options.exclude_start,
            Ordering::Greater => false,
        };
        let before_end = match position.cmp(&self.end) {
            Ordering::Less => true,
            Ordering::Equal => options.include_end,
            Ordering::Greater => false,
        };
        after_start && before_end
    }

    /// Check whether `self` is entirely inside `other`.
    pub fn is_within(&self, other: &Range) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Returns `true` if one range ends exactly where the other starts.
    pub fn touches(&self, other: &Range) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// Check whether `other` overlaps this range when `self` is used as the query.
    ///
    /// Interiors intersect when `other.start < self.end && self.start < other.end`. For an empty
    /// query at `p` this reduces to `other` strictly containing `p`.
    pub fn overlaps(&self, other: &Range, options: OverlapOptions) -> bool {
        if other.start < self.end && self.start < other.end {
            return true;
        }
        (options.include_touching_start && other.end == self.start)
            || (options.include_touching_end && other.start == self.end)
    }

    /// The smallest range covering both `self` and `other`.
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_order_is_line_then_column() {
        assert!(Position::new(0, 10) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(
            Position::new(1, 1).cmp(&Position::new(1, 1)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_range_new_normalizes() {
        let r = Range::from_coords((3, 1), (1, 4));
        assert_eq!(r.start, Position::new(1, 4));
        assert_eq!(r.end, Position::new(3, 1));
    }

    #[test]
    fn test_contains_flags() {
        let r = Range::on_line(0, 2, 4);
        let start = Position::new(0, 2);
        let end = Position::new(0, 4);

        assert!(r.contains(start, FindOptions::default()));
        assert!(!r.contains(end, FindOptions::default()));

        let opts = FindOptions {
            exclude_start: true,
            include_end: true,
        };
        assert!(!r.contains(start, opts));
        assert!(r.contains(end, opts));
        assert!(r.contains(Position::new(0, 3), opts));
    }

    #[test]
    fn test_overlap_interior_and_touching() {
        let query = Range::on_line(0, 4, 8);
        let before = Range::on_line(0, 1, 4);
        let after = Range::on_line(0, 8, 9);
        let inside = Range::on_line(0, 5, 6);

        assert!(query.overlaps(&inside, OverlapOptions::default()));
        assert!(!query.overlaps(&before, OverlapOptions::default()));
        assert!(!query.overlaps(&after, OverlapOptions::default()));
        assert!(query.overlaps(&before, OverlapOptions::TOUCHING));
        assert!(query.overlaps(&after, OverlapOptions::TOUCHING));
    }

    #[test]
    fn test_empty_query_overlaps_only_strict_containers() {
        let point = Range::empty(Position::new(0, 3));
        assert!(point.overlaps(&Range::on_line(0, 2, 4), OverlapOptions::default()));
        assert!(!point.overlaps(&Range::on_line(0, 3, 4), OverlapOptions::default()));
        assert!(!point.overlaps(&Range::on_line(0, 1, 3), OverlapOptions::default()));
    }
}
