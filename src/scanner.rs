//! Workspace and per-document scan orchestration.
//!
//! The [`Scanner`] drives the pattern extractor and the index: it discovers
//! candidate files, snapshots document text, and applies the two-phase
//! full-scan algorithm. Reads and parsing run on a bounded worker pool;
//! index mutation itself is serial, in discovery order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use rayon::prelude::*;
use ropey::Rope;
use tower_lsp::lsp_types::{Location, Url};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::index::{MediaDefinition, MediaIndex, MediaReference};
use crate::media_parser::{self, DefinitionMatch, ReferenceMatch};

/// A document participating in a scan: its identity plus a snapshot of its
/// text at scan time.
#[derive(Debug, Clone)]
pub struct ScannedDocument {
    pub uri: Url,
    pub text: String,
}

impl ScannedDocument {
    pub fn new(uri: Url, text: impl Into<String>) -> ScannedDocument {
        ScannedDocument {
            uri,
            text: text.into(),
        }
    }
}

/// Orchestrates full-workspace scans against a [`MediaIndex`].
pub struct Scanner {
    pool: rayon::ThreadPool,
}

impl Scanner {
    pub fn new(settings: &Settings) -> anyhow::Result<Scanner> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.scan_concurrency)
            .build()?;

        Ok(Scanner { pool })
    }

    /// Every tracked file under `root_dir`. Hidden directories are skipped.
    pub fn discover_paths(&self, settings: &Settings, root_dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(root_dir)
            .into_iter()
            .filter_entry(|e| {
                !e.file_name()
                    .to_str()
                    .map(|s| s.starts_with('.'))
                    .unwrap_or(false)
            })
            .flatten()
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| settings.file_extensions.iter().any(|tracked| tracked == ext))
            })
            .map(|e| e.path().to_path_buf())
            .collect_vec()
    }

    /// Snapshot every document a full scan should cover: tracked files on
    /// disk plus the currently open documents, the open copy winning over
    /// its on-disk contents. A file that fails to read is dropped from the
    /// scan without affecting its siblings.
    pub fn collect_documents(
        &self,
        settings: &Settings,
        root_dir: &Path,
        open_documents: &HashMap<Url, Rope>,
    ) -> Vec<ScannedDocument> {
        let paths = self.discover_paths(settings, root_dir);

        let mut documents: Vec<ScannedDocument> = self.pool.install(|| {
            paths
                .par_iter()
                .flat_map(|path| {
                    let uri = Url::from_file_path(path).ok()?;
                    if open_documents.contains_key(&uri) {
                        return None;
                    }
                    let text = std::fs::read_to_string(path).ok()?;
                    Some(ScannedDocument { uri, text })
                })
                .collect()
        });

        documents.extend(
            open_documents
                .iter()
                .map(|(uri, rope)| ScannedDocument::new(uri.clone(), rope.to_string())),
        );

        documents
    }

    /// Rebuild the index from scratch for the given document set.
    ///
    /// Indexing is two-phase: every definition across the whole set is
    /// indexed before any reference is. A reference in one document to a
    /// name defined in another therefore resolves regardless of the order
    /// documents were discovered in.
    pub fn full_scan(&self, index: &mut MediaIndex, documents: &[ScannedDocument]) {
        index.clear();

        let parsed: Vec<(&Url, Vec<DefinitionMatch>, Vec<ReferenceMatch>)> =
            self.pool.install(|| {
                documents
                    .par_iter()
                    .map(|document| {
                        (
                            &document.uri,
                            media_parser::definitions(&document.text).collect_vec(),
                            media_parser::references(&document.text).collect_vec(),
                        )
                    })
                    .collect()
            });

        for (uri, definitions, _) in &parsed {
            for definition in definitions {
                index.add_definition(to_definition(uri, definition));
            }
        }

        for (uri, _, references) in &parsed {
            for reference in references {
                index.add_reference(to_reference(uri, reference));
            }
        }
    }
}

/// Re-index a single document against the current index state.
///
/// All prior entries for the document are dropped first: a rescan is a full
/// replacement, never a diff, so a superseded in-flight scan cannot leave
/// stale or duplicate entries behind. Cross-document definitions are already
/// indexed, so a single pass suffices here.
pub fn rescan_document(index: &mut MediaIndex, uri: &Url, text: &str) {
    index.remove_document(uri);

    for definition in media_parser::definitions(text) {
        index.add_definition(to_definition(uri, &definition));
    }

    for reference in media_parser::references(text) {
        index.add_reference(to_reference(uri, &reference));
    }
}

fn to_definition(uri: &Url, definition: &DefinitionMatch) -> MediaDefinition {
    MediaDefinition {
        name: definition.name.clone(),
        value: definition.value.clone(),
        location: Location {
            uri: uri.clone(),
            range: *definition.range,
        },
    }
}

fn to_reference(uri: &Url, reference: &ReferenceMatch) -> MediaReference {
    MediaReference {
        name: reference.name.clone(),
        location: Location {
            uri: uri.clone(),
            range: *reference.range,
        },
    }
}
