use ropey::Rope;
use tower_lsp::lsp_types::{Location, Position};

use crate::{index::MediaIndex, media_parser};

/// All recorded usage sites of the custom media name under the cursor.
/// Not-found when there is no token there, and when the name has no known
/// definition (the index never records references to undefined names).
pub fn references(
    index: &MediaIndex,
    cursor_position: Position,
    rope: &Rope,
) -> Option<Vec<Location>> {
    let name = media_parser::name_at_position(rope, cursor_position)?;

    if !index.has_definition(&name) {
        return None;
    }

    Some(
        index
            .references(&name)
            .iter()
            .map(|reference| reference.location.clone())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{index_documents, test_uri};

    #[test]
    fn test_references_from_definition_cursor() {
        let text = "@custom-media --lg (min-width: 1201px);\n@media (--lg) {}\ndiv {\n  color: red;\n}\n@media (--lg) {}\n";
        let index = index_documents(&[("styles.css", text)]);
        let rope = Rope::from_str(text);

        let locations = references(
            &index,
            Position {
                line: 0,
                character: 16,
            },
            &rope,
        )
        .expect("Name has a definition");

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].uri, test_uri("styles.css"));
        assert_eq!(locations[0].range.start.line, 1);
        assert_eq!(locations[1].range.start.line, 5);
    }

    #[test]
    fn test_references_for_undefined_name_is_not_found() {
        let text = "@media (--missing) {}\n";
        let index = index_documents(&[("styles.css", text)]);
        let rope = Rope::from_str(text);

        let result = references(
            &index,
            Position {
                line: 0,
                character: 10,
            },
            &rope,
        );

        assert!(result.is_none());
    }

    #[test]
    fn test_references_collected_across_documents() {
        let index = index_documents(&[
            ("breakpoints.css", "@custom-media --narrow (max-width: 600px);\n"),
            ("layout.css", "@media (--narrow) {}\n"),
            ("cards.css", "@media (--narrow) { .card { border: 0; } }\n"),
        ]);
        let rope = Rope::from_str("@custom-media --narrow (max-width: 600px);\n");

        let locations = references(
            &index,
            Position {
                line: 0,
                character: 18,
            },
            &rope,
        )
        .unwrap();

        assert_eq!(locations.len(), 2);
        let uris: Vec<String> = locations.iter().map(|l| l.uri.to_string()).collect();
        assert!(uris.iter().any(|u| u.contains("layout.css")));
        assert!(uris.iter().any(|u| u.contains("cards.css")));
    }
}
