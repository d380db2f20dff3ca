//! Document access.
//!
//! The match engine only needs line-level read access to the buffer it indexes. Hosts implement
//! [`TextDocument`] over their own buffer type; [`RopeDocument`] is a ready-made implementation
//! that can also apply [`TextEdit`]s, which keeps a local copy of the buffer in lockstep with
//! the host.

use crate::delta::{EditDelta, TextEdit};
use crate::position::{Position, Range};
use crate::text::utf16_len;
use ropey::Rope;
use std::borrow::Cow;

/// Read access to a line-oriented text buffer.
///
/// Line texts exclude the line terminator (`\n` or `\r\n`). Columns are UTF-16 code units.
pub trait TextDocument {
    /// Number of lines. An empty document has one (empty) line.
    fn line_count(&self) -> usize;

    /// Text of `line` without its terminator, or `None` past the last line.
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Length of `line` in UTF-16 code units (0 past the last line).
    fn line_len(&self, line: usize) -> usize {
        self.line_text(line).map_or(0, |text| utf16_len(&text))
    }

    /// Clamp a position to the document: past the last line maps to the document end, past the
    /// end of a line maps to the line end.
    fn clamp_position(&self, position: Position) -> Position {
        let last_line = self.line_count().saturating_sub(1);
        if position.line > last_line {
            return Position::new(last_line, self.line_len(last_line));
        }
        Position::new(
            position.line,
            position.column.min(self.line_len(position.line)),
        )
    }

    /// Clamp both endpoints of `range` to the document.
    fn clamp_range(&self, range: Range) -> Range {
        Range::new(
            self.clamp_position(range.start),
            self.clamp_position(range.end),
        )
    }

    /// The range covering the whole document.
    fn full_range(&self) -> Range {
        let last_line = self.line_count().saturating_sub(1);
        Range::new(
            Position::line_start(0),
            Position::new(last_line, self.line_len(last_line)),
        )
    }
}

/// Rope-backed document.
///
/// Only `\n` starts a new line; a `\r` directly before it is treated as part of the terminator.
#[derive(Debug, Clone, Default)]
pub struct RopeDocument {
    rope: Rope,
}

impl RopeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Full text of the document.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char offset of `position` (clamped to the document).
    pub fn position_to_char(&self, position: Position) -> usize {
        let position = self.clamp_position(position);
        let line_start = self.rope.line_to_char(position.line);
        let line = self.rope.line(position.line);
        line_start + line.utf16_cu_to_char(position.column)
    }

    /// Apply an edit and return its delta.
    ///
    /// The edit range is clamped to the document first; the returned delta describes the
    /// clamped edit.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> EditDelta {
        let range = self.clamp_range(edit.range);
        let start = self.position_to_char(range.start);
        let end = self.position_to_char(range.end);

        if start < end {
            self.rope.remove(start..end);
        }
        if !edit.text.is_empty() {
            self.rope.insert(start, &edit.text);
        }

        EditDelta::new(range, &edit.text)
    }
}

impl TextDocument for RopeDocument {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let slice = self.rope.line(line);
        let text: Cow<'_, str> = slice.into();
        // A lone `\r` is ordinary text; only `\r\n` counts as a terminator.
        let trimmed_len = match text.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line).len(),
            None => text.len(),
        };

        Some(match text {
            Cow::Borrowed(s) => Cow::Borrowed(&s[..trimmed_len]),
            Cow::Owned(mut s) => {
                s.truncate(trimmed_len);
                Cow::Owned(s)
            }
        })
    }
}
