use ropey::Rope;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity};

use crate::{config::Settings, index::MediaIndex, media_parser};

/// Compute the undefined-reference diagnostics for one document.
///
/// References are extracted fresh from the document text rather than read
/// back from the index: the index only records references whose name is
/// defined, while this pass must see every reference. The result is a
/// complete replacement set for the document; the caller publishes it over
/// whatever was reported before.
pub fn diagnostics(index: &MediaIndex, settings: &Settings, text: &str) -> Option<Vec<Diagnostic>> {
    if !settings.undefined_diagnostics {
        return None;
    }

    let rope = Rope::from_str(text);

    let diags = media_parser::references(text)
        .filter(|reference| !index.has_definition(&reference.name))
        .filter(|reference| {
            // A bare `(--name)` also matches ordinary custom property syntax
            // such as `var(--name)`; only lines using the name in a media
            // query are diagnosed. Line-based, so a `@media` prelude split
            // across lines escapes detection.
            rope.get_line(reference.range.start.line as usize)
                .is_some_and(|line| line.to_string().contains("@media"))
        })
        .map(|reference| Diagnostic {
            range: *reference.range,
            message: format!("Undefined custom media query: {}", reference.name),
            source: Some("mediq".into()),
            severity: Some(DiagnosticSeverity::ERROR),
            ..Default::default()
        })
        .collect();

    Some(diags)
}
