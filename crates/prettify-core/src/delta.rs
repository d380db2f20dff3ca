//! Edit deltas.
//!
//! An edit replaces an old [`Range`] with new text. [`EditDelta`] derives the range the new
//! text occupies afterwards and the shift that moves every position behind the edit into
//! post-edit coordinates.
//!
//! Semantics:
//! - positions before `old.start` are untouched.
//! - positions at or after `old.end` move by the extent difference: the line delta always, the
//!   column delta only on the old end line.
//! - positions strictly inside the old range have no image; their ranges must be dropped.

use crate::position::{Position, Range};
use crate::text::TextExtent;

/// A single replacement edit as delivered by the host: `range` is replaced by `text`.
///
/// Edits inside one change notification are applied **in order**; each edit's range is
/// expressed in coordinates after the previous edits were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Replaced range (pre-edit coordinates).
    pub range: Range,
    /// Inserted text (may be empty).
    pub text: String,
}

impl TextEdit {
    /// Create a replacement edit.
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert `text` at `position`.
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self::new(Range::empty(position), text)
    }

    /// Delete `range`.
    pub fn delete(range: Range) -> Self {
        Self::new(range, String::new())
    }
}

/// Position mapping derived from one [`TextEdit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDelta {
    old: Range,
    new: Range,
}

impl EditDelta {
    /// Build the delta for replacing `old` with `text`.
    pub fn new(old: Range, text: &str) -> Self {
        let extent = TextExtent::of(text);
        let new_end = if extent.lines == 0 {
            Position::new(old.start.line, old.start.column + extent.last_line_len)
        } else {
            Position::new(old.start.line + extent.lines, extent.last_line_len)
        };
        Self {
            old,
            new: Range {
                start: old.start,
                end: new_end,
            },
        }
    }

    /// Build the delta for a host edit.
    pub fn from_edit(edit: &TextEdit) -> Self {
        Self::new(edit.range, &edit.text)
    }

    /// The replaced range (pre-edit coordinates).
    pub fn old_range(&self) -> Range {
        self.old
    }

    /// The range the inserted text occupies (post-edit coordinates).
    pub fn new_range(&self) -> Range {
        self.new
    }

    /// Net change in line count.
    pub fn line_delta(&self) -> isize {
        self.new.end.line as isize - self.old.end.line as isize
    }

    /// Returns `true` if the edit neither removes nor inserts anything.
    pub fn is_noop(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }

    /// Map a pre-edit position to post-edit coordinates.
    ///
    /// Returns `None` for positions strictly inside the replaced range. For an insertion
    /// (empty old range) a position at the insertion point moves behind the inserted text.
    pub fn translate(&self, position: Position) -> Option<Position> {
        if position >= self.old.end {
            Some(self.translate_after(position))
        } else if position <= self.old.start {
            Some(position)
        } else {
            None
        }
    }

    /// Map a position known to be at or after `old.end`.
    pub(crate) fn translate_after(&self, position: Position) -> Position {
        debug_assert!(position >= self.old.end);
        if position.line == self.old.end.line {
            Position::new(
                self.new.end.line,
                self.new.end.column + (position.column - self.old.end.column),
            )
        } else {
            let line = position.line as isize + self.line_delta();
            Position::new(line as usize, position.column)
        }
    }

    /// Map a pre-edit range through this edit, widening it to cover the inserted text when it
    /// intersects or touches the replaced span.
    ///
    /// Used to carry dirty windows of earlier edits forward through later edits of the same
    /// change notification.
    pub fn map_range(&self, range: Range) -> Range {
        if range.end < self.old.start {
            return range;
        }
        if range.start > self.old.end {
            return Range {
                start: self.translate_after(range.start),
                end: self.translate_after(range.end),
            };
        }

        let start = if range.start < self.old.start {
            range.start
        } else {
            self.new.start
        };
        let end = if range.end > self.old.end {
            self.translate_after(range.end)
        } else {
            self.new.end
        };
        Range { start, end }
    }
}
