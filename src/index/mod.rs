mod types;


pub use types::{MediaDefinition, MediaReference, TextRange};

use std::collections::HashMap;

use tower_lsp::lsp_types::Url;

/// The in-memory index of custom media names: one mapping from name to
/// definitions, one from name to reference sites. This struct owns all
/// mutation rules; interpretation of the data (diagnostics, completions,
/// navigation) is up to its consumers.
///
/// Callers must serialize mutating calls per document: a rescan is
/// remove-then-add, and interleaving two such sequences for the same
/// document would leave stale entries behind.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct MediaIndex {
    definitions: HashMap<String, Vec<MediaDefinition>>,
    references: HashMap<String, Vec<MediaReference>>,
}

impl MediaIndex {
    pub fn new() -> MediaIndex {
        MediaIndex::default()
    }

    /// Append a definition to the list for its name, creating the entry if
    /// absent. Duplicate names are retained in insertion order.
    pub fn add_definition(&mut self, definition: MediaDefinition) {
        self.definitions
            .entry(definition.name.clone())
            .or_default()
            .push(definition);
    }

    /// Record a reference site. References to names with no known definition
    /// are not stored; the diagnostics pass reports those straight from the
    /// document text.
    pub fn add_reference(&mut self, reference: MediaReference) {
        if !self.definitions.contains_key(&reference.name) {
            return;
        }

        self.references
            .entry(reference.name.clone())
            .or_default()
            .push(reference);
    }

    /// Drop every entry recorded for `uri` from both mappings. A name left
    /// with no entries is removed entirely, never kept as an empty list.
    pub fn remove_document(&mut self, uri: &Url) {
        self.definitions.retain(|_, definitions| {
            definitions.retain(|definition| definition.location.uri != *uri);
            !definitions.is_empty()
        });

        self.references.retain(|_, references| {
            references.retain(|reference| reference.location.uri != *uri);
            !references.is_empty()
        });
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
        self.references.clear();
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// All definitions for `name`, in discovery order. Empty if unknown.
    pub fn definitions(&self, name: &str) -> &[MediaDefinition] {
        self.definitions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All recorded reference sites for `name`, in discovery order. Empty if
    /// unknown.
    pub fn references(&self, name: &str) -> &[MediaReference] {
        self.references
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every indexed definition, one entry per definition instance.
    pub fn iter_definitions(&self) -> impl Iterator<Item = &MediaDefinition> {
        self.definitions.values().flatten()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.references.is_empty()
    }
}
