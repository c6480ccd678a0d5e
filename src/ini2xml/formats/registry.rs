//! Output format registry
//!
//! Every output the converter can produce is a [`Formatter`] stored under its name. The
//! CLI resolves `--format` (or `output.format` from configuration) through a
//! [`FormatRegistry`] built from the active [`OutputConfig`].

use crate::ini2xml::ast::Document;
use crate::ini2xml::config::OutputConfig;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// No formatter is registered under the requested name
    UnknownFormat(String),
    /// The formatter could not render the document
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(f, "unknown output format '{name}'"),
            FormatError::Serialization(msg) => write!(f, "cannot serialize document: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders a whole [`Document`] into one output string.
pub trait Formatter: Send + Sync {
    /// Name used by `--format` and `output.format`
    fn name(&self) -> &str;

    /// One-line summary shown by `--list-formats`
    fn description(&self) -> &str;

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;
}

/// Formatters keyed by name, kept in name order
pub struct FormatRegistry {
    formatters: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self {
            formatters: BTreeMap::new(),
        }
    }

    /// The built-in formats, with XML output tuned by `config`
    pub fn with_config(config: &OutputConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(super::XmlFormatter::new(config.xml.clone()));
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry
    }

    /// Stores `formatter`, handing back the one it displaced under the same name.
    pub fn register(&mut self, formatter: impl Formatter + 'static) -> Option<Box<dyn Formatter>> {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter))
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Formatter, FormatError> {
        self.formatters
            .get(name)
            .map(|formatter| formatter.as_ref())
            .ok_or_else(|| FormatError::UnknownFormat(name.to_string()))
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.resolve(format)?.serialize(doc)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    pub fn formatters(&self) -> impl Iterator<Item = &(dyn Formatter + 'static)> {
        self.formatters.values().map(|formatter| formatter.as_ref())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_config(&OutputConfig::default())
    }
}
