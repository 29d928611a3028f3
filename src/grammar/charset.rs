//! Character Sets
//!
//! The two character classes of the aam grammar. Both the line pattern used by
//! the validator and the filter used by the fixer are derived from these.

/// A fixed set of permitted characters.
///
/// Whitespace is always a member; the rest is a list of inclusive ASCII ranges
/// plus a few single characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    ranges: &'static [(char, char)],
    extra: &'static [char],
}

const ALPHANUMERIC: &[(char, char)] = &[('a', 'z'), ('A', 'Z'), ('0', '9')];

/// Characters permitted on the key side of a line.
pub const KEY_SET: CharSet = CharSet {
    ranges: ALPHANUMERIC,
    extra: &['_'],
};

/// Characters permitted on the value side of a line.
pub const VALUE_SET: CharSet = CharSet {
    ranges: ALPHANUMERIC,
    extra: &['_', '"', '\'', '#'],
};

impl CharSet {
    /// Check membership of a single character
    pub fn contains(&self, c: char) -> bool {
        c.is_whitespace()
            || self.extra.contains(&c)
            || self
                .ranges
                .iter()
                .any(|&(low, high)| (low..=high).contains(&c))
    }

    /// True when every character of `text` belongs to the set
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().all(|c| self.contains(c))
    }

    /// Keep only the member characters of `text`, in their original order
    pub fn filter(&self, text: &str) -> String {
        text.chars().filter(|&c| self.contains(c)).collect()
    }

    /// Render the set as a regex character class, e.g. `[a-zA-Z0-9_\s]`
    pub fn regex_class(&self) -> String {
        let mut class = String::from("[");
        for &(low, high) in self.ranges {
            class.push(low);
            class.push('-');
            class.push(high);
        }
        for c in self.extra {
            class.push_str(&regex::escape(&c.to_string()));
        }
        class.push_str(r"\s]");
        class
    }
}
