//! aam Grammar
//!
//! Character classes and line views for the `key = value` grammar.
//! No validation logic here - pure data.

pub mod charset;
pub mod line;

pub use charset::{CharSet, KEY_SET, VALUE_SET};
pub use line::{lines, split_terminated, Line};
