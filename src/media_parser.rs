//! Pattern extraction for custom media syntax.
//!
//! Two textual patterns are recognized, not a CSS grammar: the
//! `@custom-media --name <condition>;` declaration and the `(--name)` usage
//! form. Each extraction call performs a self-contained scan of the given
//! text; there is no shared scan-position state between calls, so repeated
//! calls on the same text always return identical results.

use once_cell::sync::Lazy;
use regex::Regex;
use ropey::Rope;
use tower_lsp::lsp_types::Position;

use crate::index::TextRange;

/// A matched `@custom-media` declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DefinitionMatch {
    /// Name including the leading `--` marker
    pub name: String,
    /// Condition text, verbatim, up to the terminating `;`
    pub value: String,
    /// Span of the whole declaration
    pub range: TextRange,
}

/// A matched `(--name)` usage site.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReferenceMatch {
    pub name: String,
    /// Span of the name only, parens excluded
    pub range: TextRange,
}

pub fn definitions(text: &str) -> impl Iterator<Item = DefinitionMatch> + '_ {
    static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"@custom-media\s+(?<name>--[a-zA-Z0-9_-]+)\s(?<value>.+);").unwrap()
    });

    let rope = Rope::from_str(text);

    DEFINITION_RE
        .captures_iter(text)
        .flat_map(|c| match (c.get(0), c.name("name"), c.name("value")) {
            (Some(full), Some(name), Some(value)) => Some((full, name, value)),
            _ => None,
        })
        .map(move |(full, name, value)| DefinitionMatch {
            name: name.as_str().into(),
            value: value.as_str().into(),
            range: TextRange::from_byte_range(&rope, full.range()),
        })
}

pub fn references(text: &str) -> impl Iterator<Item = ReferenceMatch> + '_ {
    static REFERENCE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\((?<name>--[a-zA-Z0-9_-]+)\)").unwrap());

    let rope = Rope::from_str(text);

    REFERENCE_RE
        .captures_iter(text)
        .flat_map(|c| c.name("name"))
        .map(move |name| ReferenceMatch {
            name: name.as_str().into(),
            range: TextRange::from_byte_range(&rope, name.range()),
        })
}

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"--[a-zA-Z0-9_-]+").unwrap());

/// The custom media name token under `position`, if any. This is the word
/// lookup behind the definition and reference point queries; a cursor on
/// either edge of the token still counts as being on it.
pub fn name_at_position(rope: &Rope, position: Position) -> Option<String> {
    let line = rope.get_line(position.line as usize)?.to_string();

    NAME_RE.find_iter(&line).find_map(|m| {
        let start = line[..m.start()].chars().count() as u32;
        let end = start + m.as_str().chars().count() as u32;

        (start <= position.character && position.character <= end)
            .then(|| m.as_str().to_string())
    })
}
