//! Integration tests for the mediq library public API.
//!
//! These tests drive the crate the way the server binary does: discover and
//! scan a workspace on disk, then run the feature queries against the
//! resulting index.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use ropey::Rope;
use tempfile::TempDir;
use tower_lsp::lsp_types::{Position, Url};

use mediq::config::Settings;
use mediq::diagnostics::diagnostics;
use mediq::gotodef::goto_definition;
use mediq::index::MediaIndex;
use mediq::references::references;
use mediq::scanner::{rescan_document, Scanner};

/// Helper: temporary workspace directory; discovery skips hidden
/// directories, so the files live in a non-hidden subdirectory.
fn create_test_workspace_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let workspace_dir = temp_dir.path().join("workspace");
    fs::create_dir(&workspace_dir).expect("Failed to create workspace subdirectory");
    (temp_dir, workspace_dir)
}

fn scan_workspace(workspace_dir: &PathBuf) -> (Scanner, Settings, MediaIndex, Vec<mediq::scanner::ScannedDocument>) {
    let settings = Settings::default();
    let scanner = Scanner::new(&settings).expect("Failed to build scan pool");

    let open_documents = HashMap::new();
    let documents = scanner.collect_documents(&settings, workspace_dir, &open_documents);

    let mut index = MediaIndex::new();
    scanner.full_scan(&mut index, &documents);

    (scanner, settings, index, documents)
}

#[test]
fn test_workspace_scan_resolves_cross_file_references() {
    let (_temp_dir, workspace_dir) = create_test_workspace_dir();

    fs::write(
        workspace_dir.join("breakpoints.css"),
        "@custom-media --narrow (max-width: 600px);\n",
    )
    .unwrap();
    fs::write(
        workspace_dir.join("layout.scss"),
        "@media (--narrow) {\n  .nav { display: none; }\n}\n@media (--missing) {}\n",
    )
    .unwrap();

    let (_scanner, settings, index, documents) = scan_workspace(&workspace_dir);

    assert_eq!(documents.len(), 2, "Both tracked files were discovered");
    assert!(index.has_definition("--narrow"));
    assert_eq!(index.references("--narrow").len(), 1);

    // undefined names are diagnosed, never indexed
    assert!(index.references("--missing").is_empty());

    let layout = documents
        .iter()
        .find(|d| d.uri.path().ends_with("layout.scss"))
        .unwrap();
    let diags = diagnostics(&index, &settings, &layout.text).unwrap();

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Undefined custom media query: --missing");
    assert_eq!(diags[0].range.start.line, 3);

    let breakpoints = documents
        .iter()
        .find(|d| d.uri.path().ends_with("breakpoints.css"))
        .unwrap();
    let diags = diagnostics(&index, &settings, &breakpoints.text).unwrap();
    assert!(diags.is_empty(), "The defining file is clean");
}

#[test]
fn test_navigation_queries_against_scanned_workspace() {
    let (_temp_dir, workspace_dir) = create_test_workspace_dir();

    fs::write(
        workspace_dir.join("breakpoints.css"),
        "@custom-media --wide (min-width: 1280px);\n",
    )
    .unwrap();
    fs::write(
        workspace_dir.join("layout.css"),
        "@media (--wide) {\n  .nav { display: flex; }\n}\n",
    )
    .unwrap();

    let (_scanner, _settings, index, documents) = scan_workspace(&workspace_dir);

    let layout = documents
        .iter()
        .find(|d| d.uri.path().ends_with("layout.css"))
        .unwrap();
    let rope = Rope::from_str(&layout.text);

    // definition query from the usage site lands on breakpoints.css
    let locations = goto_definition(
        &index,
        Position {
            line: 0,
            character: 10,
        },
        &rope,
    )
    .expect("Cursor is on a name token");
    assert_eq!(locations.len(), 1);
    assert!(locations[0].uri.path().ends_with("breakpoints.css"));
    assert_eq!(locations[0].range.start.line, 0);

    // reference query from the definition site lands back on layout.css
    let breakpoints = documents
        .iter()
        .find(|d| d.uri.path().ends_with("breakpoints.css"))
        .unwrap();
    let rope = Rope::from_str(&breakpoints.text);
    let locations = references(
        &index,
        Position {
            line: 0,
            character: 16,
        },
        &rope,
    )
    .expect("Name has a definition");
    assert_eq!(locations.len(), 1);
    assert!(locations[0].uri.path().ends_with("layout.css"));
}

#[test]
fn test_edit_cycle_converges_index_and_diagnostics() {
    let (_temp_dir, workspace_dir) = create_test_workspace_dir();

    let path = workspace_dir.join("styles.css");
    fs::write(&path, "@media (--compact) {}\n").unwrap();

    let (_scanner, settings, mut index, documents) = scan_workspace(&workspace_dir);
    let uri = Url::from_file_path(&path).unwrap();

    let diags = diagnostics(&index, &settings, &documents[0].text).unwrap();
    assert_eq!(diags.len(), 1, "Reference starts out undefined");

    // an edit adds the missing definition; the rescan supersedes the old
    // generation of entries and the diagnostic clears
    let edited = "@custom-media --compact (max-width: 480px);\n@media (--compact) {}\n";
    rescan_document(&mut index, &uri, edited);

    assert!(index.has_definition("--compact"));
    assert_eq!(index.references("--compact").len(), 1);

    let diags = diagnostics(&index, &settings, edited).unwrap();
    assert!(diags.is_empty());
}
