//! mediq: a language server for CSS custom media queries
//!
//! This crate provides the core functionality for the mediq LSP server,
//! giving editors intelligence for `@custom-media` definitions in CSS,
//! PostCSS, and SCSS sources.
//!
//! # Overview
//!
//! mediq indexes `@custom-media` declarations and their `(--name)` usage
//! sites across a workspace, providing:
//!
//! - **Incremental Indexing**: an in-memory index of definitions and
//!   references, kept consistent as documents open, change, and disappear
//! - **Diagnostics**: error reporting for media-query references to names
//!   with no known definition
//! - **Navigation**: go-to-definition and find-references for custom media
//!   names
//! - **Autocomplete**: custom media name completion inside `@media (`
//!   expressions
//!
//! # Architecture
//!
//! The crate is organized around several key modules:
//!
//! - [`index`]: the keyed definition/reference mappings and their mutation
//!   rules
//! - [`media_parser`]: extraction of definition and reference patterns from
//!   raw document text
//! - [`scanner`]: workspace discovery and the full-scan/rescan orchestration
//!   that keeps the index consistent
//! - [`completion`]: the autocomplete provider for `@media` expressions
//! - [`config`]: configuration management and settings
//!
//! # Usage
//!
//! This crate is primarily used as the backing library for the `mediq`
//! binary, which implements the LSP server. The public API enables
//! programmatic access to scanning and index queries.
//!
//! ```ignore
//! use mediq::config::Settings;
//! use mediq::index::MediaIndex;
//! use mediq::scanner::Scanner;
//!
//! let settings = Settings::default();
//! let scanner = Scanner::new(&settings)?;
//! let documents = scanner.collect_documents(&settings, &root_dir, &open_documents);
//!
//! let mut index = MediaIndex::new();
//! scanner.full_scan(&mut index, &documents);
//! ```

// Core modules - index and pattern extraction
pub mod index;
pub mod media_parser;
pub mod scanner;

// LSP feature modules
pub mod completion;
pub mod diagnostics;
pub mod gotodef;
pub mod references;

// Configuration
pub mod config;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
