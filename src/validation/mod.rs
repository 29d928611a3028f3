//! Validation Engine
//!
//! Clean separation of validation logic from fixing and LSP concerns.

pub mod engine;

pub use engine::{validate_document, validate_line, Finding, Span, ViolationKind};
