//! Automatic repairs for validation findings.
//!
//! `fix` turns a finding plus the text it covers into a single replacement
//! edit. Missing keys and values have no repair since there is nothing
//! sensible to insert.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::grammar::{KEY_SET, VALUE_SET};
use crate::validation::{Finding, Span, ViolationKind};

/// Leading whitespace followed by the presumed key token
static FIRST_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[^\s=]+").expect("first token pattern is valid"));

/// Text inserted for a missing separator
pub const SEPARATOR: &str = " = ";

/// A replacement of the text at `span` by `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub span: Span,
    pub new_text: String,
}

impl Edit {
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// Apply the edit to the text of the line it targets.
    ///
    /// Columns past the end of the line are clamped to it.
    pub fn apply(&self, line: &str) -> String {
        let start = byte_offset(line, self.span.start);
        let end = byte_offset(line, self.span.end).max(start);

        let mut result = String::with_capacity(line.len() + self.new_text.len());
        result.push_str(&line[..start]);
        result.push_str(&self.new_text);
        result.push_str(&line[end..]);
        result
    }
}

/// Compute a repair for `finding`.
///
/// `context` is the text currently covered by the finding's span, except for
/// `MissingEqual` where it is the full line.
pub fn fix(finding: &Finding, context: &str) -> Option<Edit> {
    match finding.kind {
        ViolationKind::InvalidKey => Some(Edit::new(finding.span, KEY_SET.filter(context))),
        ViolationKind::InvalidValue => Some(Edit::new(finding.span, VALUE_SET.filter(context))),
        ViolationKind::MissingEqual => {
            let token = FIRST_TOKEN.find(context)?;
            let column = context[..token.end()].chars().count();
            Some(Edit::new(Span::point(finding.line(), column), SEPARATOR))
        }
        ViolationKind::MissingKey | ViolationKind::MissingValue => None,
    }
}

/// Quick-fix title offered for a kind, if it can be repaired
pub fn action_title(kind: ViolationKind) -> Option<&'static str> {
    match kind {
        ViolationKind::InvalidKey => Some("Clean key (remove invalid characters)"),
        ViolationKind::InvalidValue => Some("Clean value (remove invalid characters)"),
        ViolationKind::MissingEqual => Some("Add '='"),
        ViolationKind::MissingKey | ViolationKind::MissingValue => None,
    }
}

/// Byte offset of a character column, clamped to the end of `text`
fn byte_offset(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Line;
    use crate::validation::validate_line;

    fn finding(kind: ViolationKind, start: usize, end: usize) -> Finding {
        Finding::new(kind, Span::new(3, start, end))
    }

    #[test]
    fn test_clean_key() {
        let edit = fix(&finding(ViolationKind::InvalidKey, 0, 5), "name@").expect("edit");
        assert_eq!(edit.new_text, "name");
        assert_eq!(edit.span, Span::new(3, 0, 5));
    }

    #[test]
    fn test_clean_value_keeps_quotes_and_hash() {
        let edit =
            fix(&finding(ViolationKind::InvalidValue, 6, 20), "\"a.b\" 'c' #d!").expect("edit");
        assert_eq!(edit.new_text, "\"ab\" 'c' #d");
    }

    #[test]
    fn test_clean_to_empty() {
        let edit = fix(&finding(ViolationKind::InvalidKey, 0, 3), "@!.").expect("edit");
        assert_eq!(edit.new_text, "");
    }

    #[test]
    fn test_missing_equal_inserts_after_first_token() {
        let edit = fix(&finding(ViolationKind::MissingEqual, 0, 16), "host example.com")
            .expect("edit");
        assert_eq!(edit.span, Span::point(3, 4));
        assert_eq!(edit.new_text, " = ");
        assert_eq!(edit.apply("host example.com"), "host =  example.com");
    }

    #[test]
    fn test_missing_equal_with_indentation() {
        let edit = fix(&finding(ViolationKind::MissingEqual, 0, 9), "  key val").expect("edit");
        assert_eq!(edit.span, Span::point(3, 5));
    }

    #[test]
    fn test_missing_equal_without_token() {
        assert!(fix(&finding(ViolationKind::MissingEqual, 0, 3), "   ").is_none());
    }

    #[test]
    fn test_missing_key_and_value_have_no_fix() {
        assert!(fix(&finding(ViolationKind::MissingKey, 0, 1), "").is_none());
        assert!(fix(&finding(ViolationKind::MissingValue, 4, 4), "").is_none());
        assert!(action_title(ViolationKind::MissingKey).is_none());
        assert!(action_title(ViolationKind::MissingValue).is_none());
    }

    #[test]
    fn test_apply_uses_character_columns() {
        let edit = Edit::new(Span::new(0, 0, 4), "cl");
        assert_eq!(edit.apply("clé@ = v"), "cl = v");
    }

    #[test]
    fn test_apply_clamps_past_end() {
        let edit = Edit::new(Span::new(0, 3, 10), "");
        assert_eq!(edit.apply("abcdef"), "abc");
    }

    #[test]
    fn test_fixed_invalid_key_line_validates() {
        let text = "na-me = value";
        let findings = validate_line(&Line::new(0, text));
        assert_eq!(findings.len(), 1);

        let span = findings[0].span;
        let context: String = text.chars().skip(span.start).take(span.end - span.start).collect();
        let edit = fix(&findings[0], &context).expect("edit");
        let repaired = edit.apply(text);

        assert_eq!(repaired, "name = value");
        assert!(validate_line(&Line::new(0, &repaired)).is_empty());
    }
}
