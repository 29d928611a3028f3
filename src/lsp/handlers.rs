use std::collections::HashMap;
use std::path::PathBuf;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::config::Severity;
use crate::fix::{action_title, fix};
use crate::lsp::backend::Backend;
use crate::lsp::document::DocumentState;
use crate::validation::{validate_document, Finding, ViolationKind};

/// Source name attached to every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "aam-ls";

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
    fn is_aam_document(&self, uri: &Url, doc_state: &DocumentState) -> bool;
    fn create_lsp_diagnostic(
        &self,
        doc_state: &DocumentState,
        finding: &Finding,
    ) -> tower_lsp::lsp_types::Diagnostic;
}

/// Trait for handling code action requests
#[tower_lsp::async_trait]
pub trait HandleCodeAction {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>>;
}

fn lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

/// Violation kind carried in a diagnostic code, if it is one of ours
fn diagnostic_kind(diagnostic: &tower_lsp::lsp_types::Diagnostic) -> Option<ViolationKind> {
    match diagnostic.code.as_ref()? {
        NumberOrString::String(code) => ViolationKind::from_code(code),
        NumberOrString::Number(_) => None,
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Publish diagnostics for a document
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let diagnostics: Vec<_> = if self.is_aam_document(&uri, doc_state) {
            validate_document(&doc_state.content)
                .iter()
                .map(|finding| self.create_lsp_diagnostic(doc_state, finding))
                .collect()
        } else {
            Vec::new()
        };
        let version = Some(doc_state.version);
        drop(docs);

        log::debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    fn is_aam_document(&self, uri: &Url, doc_state: &DocumentState) -> bool {
        let path = uri
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(uri.path()));
        self.config
            .accepts_document(&doc_state.language_id, &path)
    }

    fn create_lsp_diagnostic(
        &self,
        doc_state: &DocumentState,
        finding: &Finding,
    ) -> tower_lsp::lsp_types::Diagnostic {
        tower_lsp::lsp_types::Diagnostic::new(
            doc_state.to_lsp_range(&finding.span),
            Some(lsp_severity(self.config.severity)),
            Some(NumberOrString::String(finding.kind.code().to_string())),
            Some(DIAGNOSTIC_SOURCE.to_string()),
            finding.message.clone(),
            None,
            None,
        )
    }
}

#[tower_lsp::async_trait]
impl HandleCodeAction for Backend {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };
        if !self.is_aam_document(&uri, doc_state) {
            return Ok(None);
        }

        // Findings are recomputed; earlier ones may be stale after an edit
        let findings = validate_document(&doc_state.content);
        let mut actions = Vec::new();

        for diagnostic in &params.context.diagnostics {
            let Some(kind) = diagnostic_kind(diagnostic) else {
                continue;
            };
            let Some(title) = action_title(kind) else {
                continue;
            };
            let Some(finding) = findings.iter().find(|finding| {
                finding.kind == kind && doc_state.to_lsp_range(&finding.span) == diagnostic.range
            }) else {
                log::debug!("No current finding for diagnostic {:?}", diagnostic.range);
                continue;
            };

            let context = match kind {
                ViolationKind::MissingEqual => doc_state.line(finding.line()).map(str::to_string),
                _ => doc_state.span_text(&finding.span),
            };
            let Some(edit) = context.and_then(|context| fix(finding, &context)) else {
                continue;
            };

            let text_edit = TextEdit::new(doc_state.to_lsp_range(&edit.span), edit.new_text);
            let changes = HashMap::from([(uri.clone(), vec![text_edit])]);

            actions.push(CodeActionOrCommand::CodeAction(CodeAction {
                title: title.to_string(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![diagnostic.clone()]),
                edit: Some(WorkspaceEdit::new(changes)),
                is_preferred: Some(kind != ViolationKind::MissingEqual),
                ..Default::default()
            }));
        }

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }
}
