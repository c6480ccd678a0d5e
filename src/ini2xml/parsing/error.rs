use std::{error, fmt};

/// Error that aborts a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An item line without a `key=value` pair.
    ///
    /// `line_number` is 1-based and counts every line of the input, blank ones included.
    MalformedItemLine { line_number: usize, line: String },
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedItemLine { line_number, line } => write!(
                f,
                "malformed item line {line_number}: {line:?} (expected key=value)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::MalformedItemLine {
            line_number: 7,
            line: "foo".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "malformed item line 7: \"foo\" (expected key=value)"
        );
    }
}
