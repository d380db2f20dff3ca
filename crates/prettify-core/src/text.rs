//! UTF-16 column helpers.
//!
//! Pattern matching runs over UTF-8 `&str` and reports byte offsets, while positions use UTF-16
//! code units. [`ColumnIndex`] converts between the two for a single line.

/// Number of UTF-16 code units in `text`.
pub fn utf16_len(text: &str) -> usize {
    if text.is_ascii() {
        return text.len();
    }
    text.chars().map(char::len_utf16).sum()
}

/// Line/column extent of a piece of inserted text.
///
/// `lines` counts `\n` terminators; `last_line_len` is the UTF-16 length of the text after the
/// final terminator (or of the whole text when there is none). A `\r` directly before a `\n`
/// belongs to the preceding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    /// Number of line breaks.
    pub lines: usize,
    /// UTF-16 length of the last line segment.
    pub last_line_len: usize,
}

impl TextExtent {
    /// Measure `text`.
    pub fn of(text: &str) -> Self {
        let lines = text.bytes().filter(|&b| b == b'\n').count();
        let last = match text.rfind('\n') {
            Some(idx) => &text[idx + 1..],
            None => text,
        };
        Self {
            lines,
            last_line_len: utf16_len(last),
        }
    }
}

/// Maps between byte offsets and UTF-16 columns inside one line of text.
///
/// Pure-ASCII lines take a fast path where both coordinates are identical.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    /// `(byte_offset, utf16_column)` for every char boundary, including the end of the line.
    /// `None` for ASCII lines.
    boundaries: Option<Vec<(usize, usize)>>,
    byte_len: usize,
    utf16_len: usize,
}

impl ColumnIndex {
    /// Build the index for `line`.
    pub fn new(line: &str) -> Self {
        if line.is_ascii() {
            return Self {
                boundaries: None,
                byte_len: line.len(),
                utf16_len: line.len(),
            };
        }

        let mut boundaries = Vec::with_capacity(line.len() + 1);
        let mut column = 0;
        for (byte, ch) in line.char_indices() {
            boundaries.push((byte, column));
            column += ch.len_utf16();
        }
        boundaries.push((line.len(), column));

        Self {
            boundaries: Some(boundaries),
            byte_len: line.len(),
            utf16_len: column,
        }
    }

    /// Length of the line in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        self.utf16_len
    }

    /// Length of the line in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Convert a byte offset (clamped to the line) to a UTF-16 column.
    ///
    /// Offsets inside a multi-byte character resolve to that character's column.
    pub fn byte_to_column(&self, byte: usize) -> usize {
        let byte = byte.min(self.byte_len);
        match &self.boundaries {
            None => byte,
            Some(boundaries) => {
                let idx = boundaries.partition_point(|&(b, _)| b <= byte);
                boundaries[idx.saturating_sub(1)].1
            }
        }
    }

    /// Convert a UTF-16 column (clamped to the line) to a byte offset.
    ///
    /// A column pointing into the middle of a surrogate pair resolves to the start of that
    /// character.
    pub fn column_to_byte(&self, column: usize) -> usize {
        let column = column.min(self.utf16_len);
        match &self.boundaries {
            None => column,
            Some(boundaries) => {
                let idx = boundaries.partition_point(|&(_, c)| c <= column);
                boundaries[idx.saturating_sub(1)].0
            }
        }
    }
}

/// Byte offset of the char boundary strictly after `byte`, or `None` at the end of `text`.
pub fn next_char_boundary(text: &str, byte: usize) -> Option<usize> {
    if byte >= text.len() {
        return None;
    }
    let mut next = byte + 1;
    while !text.is_char_boundary(next) {
        next += 1;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("a→b"), 3);
        assert_eq!(utf16_len("😀"), 2);
    }

    #[test]
    fn test_text_extent() {
        assert_eq!(
            TextExtent::of("abc"),
            TextExtent {
                lines: 0,
                last_line_len: 3
            }
        );
        assert_eq!(
            TextExtent::of("ab\r\ncd\n😀x"),
            TextExtent {
                lines: 2,
                last_line_len: 3
            }
        );
        assert_eq!(
            TextExtent::of("\n"),
            TextExtent {
                lines: 1,
                last_line_len: 0
            }
        );
    }

    #[test]
    fn test_column_index_ascii_fast_path() {
        let idx = ColumnIndex::new("a -> b");
        assert_eq!(idx.byte_to_column(4), 4);
        assert_eq!(idx.column_to_byte(2), 2);
        assert_eq!(idx.column_to_byte(99), 6);
    }

    #[test]
    fn test_column_index_multibyte() {
        // bytes: 'é'=2, '😀'=4, 'x'=1
        let idx = ColumnIndex::new("é😀x");
        assert_eq!(idx.utf16_len(), 4);
        assert_eq!(idx.byte_to_column(0), 0);
        assert_eq!(idx.byte_to_column(2), 1);
        assert_eq!(idx.byte_to_column(6), 3);
        assert_eq!(idx.byte_to_column(7), 4);
        assert_eq!(idx.column_to_byte(1), 2);
        // Column 2 falls inside the surrogate pair of '😀'.
        assert_eq!(idx.column_to_byte(2), 2);
        assert_eq!(idx.column_to_byte(3), 6);
    }

    #[test]
    fn test_next_char_boundary() {
        let text = "é!";
        assert_eq!(next_char_boundary(text, 0), Some(2));
        assert_eq!(next_char_boundary(text, 2), Some(3));
        assert_eq!(next_char_boundary(text, 3), None);
    }
}
