use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ropey::Rope;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use mediq::config::{self, Settings};
use mediq::index::MediaIndex;
use mediq::scanner::{self, Scanner};
use mediq::{completion, diagnostics, gotodef, references};

#[derive(Parser, Debug)]
#[command(version, about = "Language server for CSS custom media queries")]
struct Cli {
    /// Communicate over stdio. This is the only transport; the flag is
    /// accepted for editor-client compatibility.
    #[arg(long)]
    stdio: bool,
}

struct ServerContext {
    settings: Settings,
    root_dir: PathBuf,
    scanner: Scanner,
}

struct Backend {
    client: Client,
    index: Arc<RwLock<MediaIndex>>,
    documents: Arc<RwLock<HashMap<Url, Rope>>>,
    context: Arc<RwLock<Option<ServerContext>>>,
}

impl Backend {
    fn new(client: Client) -> Backend {
        Backend {
            client,
            index: Arc::new(RwLock::new(MediaIndex::new())),
            documents: Arc::new(RwLock::new(HashMap::new())),
            context: Arc::new(RwLock::new(None)),
        }
    }

    async fn scan_workspace(&self) {
        let context = self.context.read().await;
        let Some(context) = context.as_ref() else {
            return;
        };

        let documents = {
            let open = self.documents.read().await;
            context
                .scanner
                .collect_documents(&context.settings, &context.root_dir, &open)
        };

        {
            let mut index = self.index.write().await;
            context.scanner.full_scan(&mut index, &documents);
        }

        let index = self.index.read().await;
        for document in &documents {
            let diags = diagnostics::diagnostics(&index, &context.settings, &document.text)
                .unwrap_or_default();
            self.client
                .publish_diagnostics(document.uri.clone(), diags, None)
                .await;
        }

        self.client
            .log_message(
                MessageType::INFO,
                format!("indexed {} documents", documents.len()),
            )
            .await;
    }

    async fn rescan_document(&self, uri: &Url) {
        let context = self.context.read().await;
        let Some(context) = context.as_ref() else {
            return;
        };

        let text = {
            let documents = self.documents.read().await;
            let Some(rope) = documents.get(uri) else {
                return;
            };
            rope.to_string()
        };

        // remove-then-add runs inside one write-lock critical section, so
        // two rescans of the same document can never interleave
        {
            let mut index = self.index.write().await;
            scanner::rescan_document(&mut index, uri, &text);
        }

        self.publish_diagnostics_for(uri, &text, &context.settings)
            .await;
    }

    async fn publish_diagnostics_for(&self, uri: &Url, text: &str, settings: &Settings) {
        let index = self.index.read().await;
        let diags = diagnostics::diagnostics(&index, settings, text).unwrap_or_default();
        self.client
            .publish_diagnostics(uri.clone(), diags, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root_dir = params
            .root_uri
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let settings = match Settings::new(
            &root_dir,
            &params.capabilities,
            params.initialization_options.as_ref(),
        ) {
            Ok(settings) => settings,
            Err(err) => {
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("invalid configuration, falling back to defaults: {err}"),
                    )
                    .await;
                Settings::default()
            }
        };

        let scanner = match Scanner::new(&settings) {
            Ok(scanner) => scanner,
            Err(err) => {
                self.client
                    .log_message(MessageType::ERROR, format!("failed to start scanner: {err}"))
                    .await;
                return Err(tower_lsp::jsonrpc::Error::internal_error());
            }
        };

        *self.context.write().await = Some(ServerContext {
            settings,
            root_dir,
            scanner,
        });

        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::FULL,
            )),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(vec!["-".to_string()]),
                ..Default::default()
            }),
            definition_provider: Some(OneOf::Left(true)),
            references_provider: Some(OneOf::Left(true)),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: None,
                file_operations: Some(WorkspaceFileOperationsServerCapabilities {
                    did_delete: Some(FileOperationRegistrationOptions {
                        filters: vec![FileOperationFilter {
                            scheme: Some("file".to_string()),
                            pattern: FileOperationPattern {
                                glob: "**/*.{css,pcss,scss}".to_string(),
                                matches: None,
                                options: None,
                            },
                        }],
                    }),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "mediq".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities,
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.scan_workspace().await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.index.write().await.clear();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        if !config::LANGUAGE_IDS.contains(&params.text_document.language_id.as_str()) {
            return;
        }

        let uri = params.text_document.uri;
        self.documents
            .write()
            .await
            .insert(uri.clone(), Rope::from_str(&params.text_document.text));

        self.rescan_document(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        {
            let mut documents = self.documents.write().await;
            // untracked documents never made it into the map
            let Some(rope) = documents.get_mut(&uri) else {
                return;
            };
            *rope = Rope::from_str(&change.text);
        }

        self.rescan_document(&uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;

        let context = self.context.read().await;
        let Some(context) = context.as_ref() else {
            return;
        };

        let text = {
            let documents = self.documents.read().await;
            let Some(rope) = documents.get(&uri) else {
                return;
            };
            rope.to_string()
        };

        // the document did not change, but the index may have since its last
        // edit; refresh the published set
        self.publish_diagnostics_for(&uri, &text, &context.settings)
            .await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        // index entries survive until the file is deleted or rescanned
        self.documents
            .write()
            .await
            .remove(&params.text_document.uri);
    }

    async fn did_delete_files(&self, params: DeleteFilesParams) {
        let mut index = self.index.write().await;
        let mut documents = self.documents.write().await;

        for file in params.files {
            let Ok(uri) = Url::parse(&file.uri) else {
                continue;
            };
            index.remove_document(&uri);
            documents.remove(&uri);
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri.clone();

        let context = self.context.read().await;
        let Some(context) = context.as_ref() else {
            return Ok(None);
        };

        let documents = self.documents.read().await;
        let Some(rope) = documents.get(&uri) else {
            return Ok(None);
        };

        let index = self.index.read().await;
        Ok(completion::get_completions(
            &index,
            rope,
            &params,
            &context.settings,
        ))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let documents = self.documents.read().await;
        let Some(rope) = documents.get(uri) else {
            return Ok(None);
        };

        let index = self.index.read().await;
        Ok(gotodef::goto_definition(&index, position, rope).map(GotoDefinitionResponse::Array))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let documents = self.documents.read().await;
        let Some(rope) = documents.get(uri) else {
            return Ok(None);
        };

        let index = self.index.read().await;
        Ok(references::references(&index, position, rope))
    }
}

#[tokio::main]
async fn main() {
    // stdio is the only transport; parsing still rejects unknown flags and
    // serves --version
    let cli = Cli::parse();
    let _ = cli.stdio;

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
