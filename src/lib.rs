//! aam Language Server
//!
//! Validation and quick fixes for aam files, a minimal line-oriented
//! `key = value` configuration grammar.
//!
//! This library provides:
//! - The grammar's character sets and line views
//! - Per-line validation producing findings
//! - Automatic repairs for findings
//! - LSP protocol implementation and a command-line checker
//! - Configuration management

pub mod check;
pub mod config;
pub mod fix;
pub mod grammar;
pub mod lsp;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use fix::{fix, Edit};
pub use grammar::{Line, KEY_SET, VALUE_SET};
pub use validation::{validate_document, validate_line, Finding, Span, ViolationKind};
