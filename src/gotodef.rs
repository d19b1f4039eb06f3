use ropey::Rope;
use tower_lsp::lsp_types::{Location, Position};

use crate::{index::MediaIndex, media_parser};

/// Resolve the custom media name under the cursor to its declaration sites.
/// No token under the cursor is not-found; a token with no known definition
/// yields an empty list.
pub fn goto_definition(
    index: &MediaIndex,
    cursor_position: Position,
    rope: &Rope,
) -> Option<Vec<Location>> {
    let name = media_parser::name_at_position(rope, cursor_position)?;

    Some(
        index
            .definitions(&name)
            .iter()
            .map(|definition| definition.location.clone())
            .collect(),
    )
}
