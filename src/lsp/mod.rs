//! LSP Protocol Implementation
//!
//! Host side of the validator and fixer: document storage, diagnostic
//! publishing and quick-fix code actions.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
