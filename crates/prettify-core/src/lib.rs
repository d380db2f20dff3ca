#![warn(missing_docs)]
//! Prettify Core - positional building blocks for incremental match indexing
//!
//! # Overview
//!
//! `prettify-core` holds the data structures that keep a set of matched text spans consistent
//! while a buffer is edited:
//!
//! - [`Position`] / [`Range`]: `(line, column)` coordinates with UTF-16 columns
//! - [`DisjointRangeSet`]: a sorted, non-overlapping range index with point/range queries and
//!   bulk shifting by an edit
//! - [`EditDelta`]: the position mapping derived from one `(old range, new text)` edit
//! - [`TextDocument`]: line-level read access to a buffer, with a rope-backed implementation
//!
//! # Quick Start
//!
//! ```rust
//! use prettify_core::{DisjointRangeSet, EditDelta, OverlapOptions, Position, Range, TextEdit};
//!
//! let mut matches = DisjointRangeSet::new();
//! matches.insert(Range::on_line(0, 2, 4));
//!
//! // Insert one character at the start of the line.
//! let delta = EditDelta::from_edit(&TextEdit::insert(Position::new(0, 0), "x"));
//! matches.remove_overlapping(delta.old_range(), OverlapOptions::default());
//! matches.shift_range_delta(&delta);
//!
//! assert_eq!(matches.ranges(), &[Range::on_line(0, 3, 5)]);
//! ```
//!
//! # Module Description
//!
//! - [`position`] - positions, ranges, boundary options
//! - [`range_set`] - the disjoint range index
//! - [`delta`] - host edits and their position mapping
//! - [`document`] - document access trait and [`RopeDocument`]
//! - [`text`] - UTF-16 column conversion

pub mod delta;
pub mod document;
pub mod position;
pub mod range_set;
pub mod text;

pub use delta::{EditDelta, TextEdit};
pub use document::{RopeDocument, TextDocument};
pub use position::{FindOptions, OverlapOptions, Position, Range};
pub use range_set::{DisjointRangeSet, OverlapError};
pub use text::{ColumnIndex, TextExtent, utf16_len};
