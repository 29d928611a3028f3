use tower_lsp::lsp_types::{Position, Range};

use crate::grammar::lines;
use crate::validation::Span;

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    /// Language identifier sent by the client on open
    pub language_id: String,
    pub version: i32,
}

impl DocumentState {
    pub fn new(content: String, language_id: String, version: i32) -> Self {
        Self {
            content,
            language_id,
            version,
        }
    }

    /// Text of a line, without its terminator
    pub fn line(&self, index: usize) -> Option<&str> {
        lines(&self.content).nth(index).map(|line| line.text)
    }

    /// Text currently covered by a span
    pub fn span_text(&self, span: &Span) -> Option<String> {
        let line = self.line(span.line)?;
        Some(
            line.chars()
                .skip(span.start)
                .take(span.end.saturating_sub(span.start))
                .collect(),
        )
    }

    /// Convert a character-column span into an LSP range (UTF-16 columns)
    pub fn to_lsp_range(&self, span: &Span) -> Range {
        let line = self.line(span.line).unwrap_or("");
        let line_number = saturating_u32(span.line);

        Range::new(
            Position::new(line_number, utf16_column(line, span.start)),
            Position::new(line_number, utf16_column(line, span.end)),
        )
    }
}

/// UTF-16 offset of a character column
pub fn utf16_column(line: &str, column: usize) -> u32 {
    saturating_u32(line.chars().take(column).map(char::len_utf16).sum())
}

/// LSP positions are `u32`; anything larger clamps to the end
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
