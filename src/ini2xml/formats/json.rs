//! JSON dump of the parsed model

use super::registry::{FormatError, Formatter};
use crate::ini2xml::ast::Document;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_json::to_string_pretty(doc)
            .map_err(|err| FormatError::Serialization(err.to_string()))
    }

    fn description(&self) -> &str {
        "Parsed sections and items as JSON"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini2xml::parsing::parse_str;
    use serde_json::json;

    #[test]
    fn test_json_mirrors_model() {
        let doc = parse_str("; top\n[s]\n; c\nk=v\n").unwrap();
        let output = JsonFormatter.serialize(&doc).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "sections": [{
                    "name": "s",
                    "comments": [" top"],
                    "items": [{ "key": "k", "value": "v", "comments": [" c"] }]
                }]
            })
        );
    }
}
