//! Core types for indexed custom media data.

use std::ops::{Deref, Range};

use ropey::Rope;
use tower_lsp::lsp_types::{Location, Position};

/// A wrapper around `tower_lsp::lsp_types::Range` with additional utilities.
///
/// Provides conversion from byte offsets to LSP positions using rope-based
/// character counting.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct TextRange(pub tower_lsp::lsp_types::Range);

impl TextRange {
    /// Creates a `TextRange` from a byte offset range using the rope for
    /// position calculation.
    pub fn from_byte_range(rope: &Rope, range: Range<usize>) -> TextRange {
        // convert from byte offset to char offset
        let char_start = rope.byte_to_char(range.start);
        let char_end = rope.byte_to_char(range.end);

        let start_line = rope.char_to_line(char_start);
        let start_offset = char_start - rope.line_to_char(start_line);

        let end_line = rope.char_to_line(char_end);
        let end_offset = char_end - rope.line_to_char(end_line);

        tower_lsp::lsp_types::Range {
            start: Position {
                line: start_line as u32,
                character: start_offset as u32,
            },
            end: Position {
                line: end_line as u32,
                character: end_offset as u32,
            },
        }
        .into()
    }
}

impl Deref for TextRange {
    type Target = tower_lsp::lsp_types::Range;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<tower_lsp::lsp_types::Range> for TextRange {
    fn from(range: tower_lsp::lsp_types::Range) -> Self {
        TextRange(range)
    }
}

/// A `@custom-media` declaration site.
///
/// `value` is the media condition text exactly as written, e.g.
/// `(max-width: 600px)`. The location range spans the whole declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MediaDefinition {
    /// Name including the leading `--` marker
    pub name: String,
    pub value: String,
    pub location: Location,
}

/// A usage site of a custom media name. The location range spans the name
/// itself, without the surrounding parens.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MediaReference {
    pub name: String,
    pub location: Location,
}
