//! Document Lines
//!
//! Immutable per-line views over a document, derived fresh on every pass.

/// One line of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 0-based line index
    pub index: usize,
    /// Raw line content without its terminator
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(index: usize, text: &'a str) -> Self {
        Self { index, text }
    }

    /// Empty or whitespace-only lines carry no record
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length of the line in character columns
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split a document into `(body, terminator)` pairs.
///
/// `\r\n`, `\n` and a lone `\r` all end a line, as they do for LSP clients.
/// A trailing terminator does not start an extra empty line.
pub fn split_terminated(content: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let Some(pos) = rest.find(['\n', '\r']) else {
            let body = rest;
            rest = "";
            return Some((body, ""));
        };

        let width = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        let (body, tail) = rest.split_at(pos);
        let (terminator, next) = tail.split_at(width);
        rest = next;
        Some((body, terminator))
    })
}

/// Split a document into lines
pub fn lines(content: &str) -> impl Iterator<Item = Line<'_>> {
    split_terminated(content)
        .enumerate()
        .map(|(index, (text, _))| Line::new(index, text))
}
