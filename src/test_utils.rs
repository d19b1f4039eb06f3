//! Shared test utilities for mediq.
//!
//! Only compiled when running tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tower_lsp::lsp_types::Url;

use crate::config::Settings;
use crate::index::MediaIndex;
use crate::scanner::{ScannedDocument, Scanner};

/// Creates a temporary workspace directory for testing.
///
/// Returns (TempDir, PathBuf); keep the TempDir alive for the test duration.
/// Discovery skips hidden directories, and temp directories are often
/// created under paths like `/tmp/.tmpXXXXX`, so the files live in a
/// non-hidden `workspace` subdirectory.
pub fn create_test_workspace_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let workspace_dir = temp_dir.path().join("workspace");
    fs::create_dir(&workspace_dir).expect("Failed to create workspace subdirectory");
    (temp_dir, workspace_dir)
}

pub fn test_uri(name: &str) -> Url {
    Url::parse(&format!("file:///{name}")).expect("Failed to parse test uri")
}

pub fn test_scanner() -> Scanner {
    Scanner::new(&Settings::default()).expect("Failed to build scan pool")
}

/// Builds an index over the given `(file name, text)` pairs with a full
/// two-phase scan.
pub fn index_documents(documents: &[(&str, &str)]) -> MediaIndex {
    let documents: Vec<ScannedDocument> = documents
        .iter()
        .map(|(name, text)| ScannedDocument::new(test_uri(name), *text))
        .collect();

    let mut index = MediaIndex::new();
    test_scanner().full_scan(&mut index, &documents);
    index
}
