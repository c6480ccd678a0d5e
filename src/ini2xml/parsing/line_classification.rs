//! Line Classification
//!
//! Determines what a single (already trimmed, non-blank) line is.
//!
//! Classification order matters:
//! 1. `;` comment
//! 2. `//` comment
//! 3. `[name]` section header
//! 4. Anything else is an item line

/// Comment markers, checked in order. The marker is stripped, the rest is kept verbatim.
const COMMENT_MARKERS: [&str; 2] = [";", "//"];

/// Item key/value separator.
const SEPARATOR: char = '=';

/// Kind of a line, borrowing the relevant part of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType<'a> {
    /// Comment text with the marker removed (leading whitespace preserved)
    Comment(&'a str),
    /// Section name between the brackets
    SectionHeader(&'a str),
    /// Whole line, to be split by [`split_item`]
    Item(&'a str),
}

/// Classify a trimmed, non-blank line.
pub fn classify_line(line: &str) -> LineType<'_> {
    for marker in COMMENT_MARKERS {
        if let Some(text) = line.strip_prefix(marker) {
            return LineType::Comment(text);
        }
    }

    if let Some(name) = section_name(line) {
        return LineType::SectionHeader(name);
    }

    LineType::Item(line)
}

/// The name inside `[...]`, if the line is a header.
///
/// `[` and `]` must be two distinct characters, so a lone `[` is not a header.
fn section_name(line: &str) -> Option<&str> {
    if line.len() < 2 {
        return None;
    }
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Split an item line into a trimmed `(key, value)` pair.
///
/// The line is split on every `=` and empty segments are discarded; the key is the first
/// remaining segment and the value the second. Anything after the second segment is ignored,
/// so `key=a=b` yields `("key", "a")`. Returns `None` when fewer than two segments remain.
pub fn split_item(line: &str) -> Option<(&str, &str)> {
    let mut segments = line.split(SEPARATOR).filter(|segment| !segment.is_empty());
    let key = segments.next()?;
    let value = segments.next()?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("; comment", LineType::Comment(" comment"))]
    #[case(";comment", LineType::Comment("comment"))]
    #[case("// comment", LineType::Comment(" comment"))]
    #[case(";", LineType::Comment(""))]
    #[case(";// nested", LineType::Comment("// nested"))]
    #[case("[user]", LineType::SectionHeader("user"))]
    #[case("[]", LineType::SectionHeader(""))]
    #[case("[a b]", LineType::SectionHeader("a b"))]
    #[case("[", LineType::Item("["))]
    #[case("]", LineType::Item("]"))]
    #[case("[user", LineType::Item("[user"))]
    #[case("/ not a comment", LineType::Item("/ not a comment"))]
    #[case("key=value", LineType::Item("key=value"))]
    #[case("role[]=admin", LineType::Item("role[]=admin"))]
    fn test_classify_line(#[case] line: &str, #[case] expected: LineType<'_>) {
        assert_eq!(classify_line(line), expected);
    }

    #[rstest]
    #[case("key=value", Some(("key", "value")))]
    #[case("key = value", Some(("key", "value")))]
    #[case("key==value", Some(("key", "value")))]
    #[case("=key=value", Some(("key", "value")))]
    #[case("key=a=b", Some(("key", "a")))]
    #[case("key= ", Some(("key", "")))]
    #[case("a =  = b", Some(("a", "")))]
    #[case("foo", None)]
    #[case("key=", None)]
    #[case("=value", None)]
    #[case("===", None)]
    fn test_split_item(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_item(line), expected);
    }
}
