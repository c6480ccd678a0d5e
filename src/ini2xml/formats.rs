//! Output format implementations for document serialization
//!
//! - `xml`: the converter's output document
//! - `treeviz`: a tree view of the parsed model, for inspection
//! - `json`: the parsed model as JSON

pub mod json;
pub mod registry;
pub mod treeviz;
pub mod xml;

pub use json::JsonFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
pub use xml::{serialize_document as serialize_xml, XmlFormatter};
