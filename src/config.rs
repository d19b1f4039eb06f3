use std::path::Path;

use anyhow::anyhow;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use tower_lsp::lsp_types::ClientCapabilities;

/// Language identifiers recognized for open documents.
pub const LANGUAGE_IDS: &[&str] = &["css", "postcss", "scss"];

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Report references to undefined custom media names
    pub undefined_diagnostics: bool,
    pub completions: bool,
    /// File extensions indexed during workspace scans
    pub file_extensions: Vec<String>,
    /// Upper bound on concurrently scanned documents
    pub scan_concurrency: usize,
}

impl Settings {
    /// Layered load: user config file, then workspace config file, then LSP
    /// initialization options, over built-in defaults. Completion support is
    /// forced off when the client cannot use it.
    pub fn new(
        root_dir: &Path,
        capabilities: &ClientCapabilities,
        initialization_options: Option<&serde_json::Value>,
    ) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/mediq/settings");
        let mut builder = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.mediq",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            );

        if let Some(options) = initialization_options {
            builder = builder.add_source(File::from_str(&options.to_string(), FileFormat::Json));
        }

        let settings = builder
            .set_default("undefined_diagnostics", true)?
            .set_default("completions", true)?
            .set_default(
                "file_extensions",
                vec!["css".to_string(), "pcss".to_string(), "scss".to_string()],
            )?
            .set_default("scan_concurrency", 10_i64)?
            .set_override_option(
                "completions",
                capabilities.text_document.as_ref().and_then(|it| {
                    match it.completion.is_none() {
                        true => Some(false),
                        false => None,
                    }
                }),
            )?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            undefined_diagnostics: true,
            completions: true,
            file_extensions: vec!["css".to_string(), "pcss".to_string(), "scss".to_string()],
            scan_concurrency: 10,
        }
    }
}
