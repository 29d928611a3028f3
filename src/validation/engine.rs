//! Validation Engine
//!
//! Core validation logic separated from fixing and LSP concerns.
//! Every line is checked on its own; there is no state between lines.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::grammar::{lines, Line, KEY_SET, VALUE_SET};

/// Whole-line pattern for a valid record, derived from the two character sets
static VALID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^\s*{}+\s*=\s*{}+\s*$",
        KEY_SET.regex_class(),
        VALUE_SET.regex_class()
    );
    Regex::new(&pattern).expect("line pattern is built from constant character sets")
});

/// The closed set of malformations the validator reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    MissingEqual,
    MissingKey,
    MissingValue,
    InvalidKey,
    InvalidValue,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::MissingEqual,
        ViolationKind::MissingKey,
        ViolationKind::MissingValue,
        ViolationKind::InvalidKey,
        ViolationKind::InvalidValue,
    ];

    /// Stable identifier, used as the diagnostic code
    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::MissingEqual => "missingEqual",
            ViolationKind::MissingKey => "missingKey",
            ViolationKind::MissingValue => "missingValue",
            ViolationKind::InvalidKey => "invalidKey",
            ViolationKind::InvalidValue => "invalidValue",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Human-readable message attached to every finding of this kind
    pub fn message(self) -> &'static str {
        match self {
            ViolationKind::MissingEqual => "Invalid format. Expected 'key=value'. Missing '='.",
            ViolationKind::MissingKey => "Missing key.",
            ViolationKind::MissingValue => "Missing value.",
            ViolationKind::InvalidKey => "Key contains invalid characters.",
            ViolationKind::InvalidValue => "Value contains invalid characters.",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Half-open span of character columns on a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// Zero-width span, used for insertions
    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, column)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A single grammar violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub span: Span,
    pub kind: ViolationKind,
    pub message: String,
}

impl Finding {
    pub fn new(kind: ViolationKind, span: Span) -> Self {
        Self {
            span,
            kind,
            message: kind.message().to_string(),
        }
    }

    /// 0-based index of the offending line
    pub fn line(&self) -> usize {
        self.span.line
    }
}

/// A trimmed side of a line and the column where it starts
struct Segment {
    text: String,
    start: usize,
}

impl Segment {
    fn trimmed(chars: &[char], offset: usize) -> Self {
        let leading = chars.iter().take_while(|c| c.is_whitespace()).count();
        let trailing = chars[leading..]
            .iter()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count();

        Self {
            text: chars[leading..chars.len() - trailing].iter().collect(),
            start: offset + leading,
        }
    }
}

/// Validate a single line
pub fn validate_line(line: &Line<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();

    if line.is_blank() || VALID_LINE.is_match(line.text) {
        return findings;
    }

    let chars: Vec<char> = line.text.chars().collect();
    let len = chars.len();

    let Some(equal) = chars.iter().position(|&c| c == '=') else {
        findings.push(Finding::new(
            ViolationKind::MissingEqual,
            Span::new(line.index, 0, len),
        ));
        return findings;
    };

    let key = Segment::trimmed(&chars[..equal], 0);
    if key.text.is_empty() {
        findings.push(Finding::new(
            ViolationKind::MissingKey,
            Span::new(line.index, 0, equal),
        ));
    } else if !KEY_SET.accepts(&key.text) {
        findings.push(Finding::new(
            ViolationKind::InvalidKey,
            Span::new(line.index, key.start, equal),
        ));
    }

    let value = Segment::trimmed(&chars[equal + 1..], equal + 1);
    if value.text.is_empty() {
        findings.push(Finding::new(
            ViolationKind::MissingValue,
            Span::new(line.index, equal + 1, len),
        ));
    } else if !VALUE_SET.accepts(&value.text) {
        findings.push(Finding::new(
            ViolationKind::InvalidValue,
            Span::new(line.index, value.start, len),
        ));
    }

    findings
}

/// Validate an entire document
pub fn validate_document(content: &str) -> Vec<Finding> {
    lines(content)
        .flat_map(|line| validate_line(&line))
        .collect()
}
