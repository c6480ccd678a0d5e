//! Parsing of INI source text into a [`Document`](crate::ini2xml::ast::Document)
//!
//! Parsing is line based. Every line is trimmed and blank lines are dropped before
//! classification, then each remaining line is one of:
//!
//! - a comment (`; text` or `// text`), buffered until the next header or item
//! - a section header (`[name]`)
//! - an item (`key = value`)
//!
//! Buffered comments are attached to the node produced by the next header or item line.
//! Comments left in the buffer at the end of the input are dropped.

pub mod error;
pub mod line_classification;
pub mod parser;

pub use error::ParseError;
pub use line_classification::{classify_line, split_item, LineType};
pub use parser::{parse_lines, parse_str};
