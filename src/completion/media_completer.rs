//! Completer for custom media names inside a `@media (` expression.
//!
//! Activates when the line text before the cursor contains `@media` and the
//! character two positions back is an open paren, for example `@media (-|`
//! where `|` is the cursor. The `-` trigger character lands the cursor in
//! exactly that shape when the user starts typing a name.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation};

use super::{Completable, Completer, Context};
use crate::index::MediaDefinition;

pub struct MediaCompleter<'a> {
    context: Context<'a>,
}

impl<'a> Completer<'a> for MediaCompleter<'a> {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        if !context.settings.completions {
            return None;
        }

        let line_string = context.rope.get_line(line)?.to_string();

        let preceding: String = line_string
            .chars()
            .take(character.saturating_sub(1))
            .collect();
        if !preceding.contains("@media") {
            return None;
        }

        let trigger = line_string.chars().nth(character.checked_sub(2)?)?;
        if trigger != '(' {
            return None;
        }

        Some(MediaCompleter { context })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        self.context
            .index
            .iter_definitions()
            .map(|definition| MediaCompletion { definition })
            .collect()
    }
}

pub struct MediaCompletion<'a> {
    definition: &'a MediaDefinition,
}

impl<'a> Completable<'a, MediaCompleter<'a>> for MediaCompletion<'a> {
    fn completions(&self, _completer: &MediaCompleter<'a>) -> Option<CompletionItem> {
        Some(CompletionItem {
            label: self.definition.name.clone(),
            kind: Some(CompletionItemKind::VARIABLE),
            detail: Some("Custom Media Query".to_string()),
            documentation: Some(Documentation::String(self.definition.value.clone())),
            ..Default::default()
        })
    }
}
