use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{HandleCodeAction, HandleDiagnostics};
use crate::Config;

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub config: Config,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        Self {
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        work_done_progress_options: Default::default(),
                        resolve_provider: Some(false),
                    },
                )),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "aam-language-server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "aam-language-server initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> tower_lsp::jsonrpc::Result<Option<CodeActionResponse>> {
        self.handle_code_action(params).await
    }

    // Store opened documents for diagnostics and code actions
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        let uri = document.uri.clone();
        log::debug!("Opened {} ({})", uri, document.language_id);

        let doc_state = DocumentState::new(document.text, document.language_id, document.version);

        let mut docs = self.documents.lock().await;
        docs.insert(uri.clone(), doc_state);
        drop(docs); // Release the lock before calling publish_diagnostics

        self.publish_diagnostics(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;

        // Full sync: the last change carries the whole document
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut docs = self.documents.lock().await;
            let language_id = docs
                .get(&uri)
                .map(|state| state.language_id.clone())
                .unwrap_or_default();
            docs.insert(
                uri.clone(),
                DocumentState::new(change.text, language_id, version),
            );
            drop(docs);

            self.publish_diagnostics(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.lock().await.remove(&uri);

        // Findings for a closed document are stale
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}
