//! Document loading and conversion API
//!
//! `DocumentLoader` is the entry point for a whole conversion run: decode the input bytes,
//! parse them, serialize the document with a registered format and write the result.
//!
//! # Architecture
//!
//! - String-based methods are the core functionality (`parse`, `convert`)
//! - File-based methods are thin wrappers (read file, then call the string method)
//! - Output is fully serialized in memory before the destination is opened, so a failed run
//!   never leaves a partial file behind
//!
//! # Examples
//!
//! ```rust,ignore
//! use ini2xml::ini2xml::loader::DocumentLoader;
//!
//! let loader = DocumentLoader::new();
//! let xml = loader.convert("[user]\nname=Alice\n", "xml")?;
//! loader.convert_file("settings.ini", "settings.xml", "xml")?;
//! ```

use crate::ini2xml::ast::Document;
use crate::ini2xml::config::OutputConfig;
use crate::ini2xml::formats::{FormatError, FormatRegistry};
use crate::ini2xml::parsing::{parse_str, ParseError};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::{Path, PathBuf};
use std::{error, fmt, fs, io};

/// Error that can occur while converting a file
#[derive(Debug)]
pub enum ConvertError {
    InputNotFound(PathBuf),
    ReadFailure { path: PathBuf, source: io::Error },
    Parse(ParseError),
    Format(FormatError),
    OutputWriteFailure { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InputNotFound(path) => {
                write!(f, "input file not found: {}", path.display())
            }
            ConvertError::ReadFailure { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConvertError::Parse(err) => fmt::Display::fmt(err, f),
            ConvertError::Format(err) => fmt::Display::fmt(err, f),
            ConvertError::OutputWriteFailure { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ConvertError::ReadFailure { source, .. }
            | ConvertError::OutputWriteFailure { source, .. } => Some(source),
            ConvertError::Parse(err) => Some(err),
            ConvertError::Format(err) => Some(err),
            ConvertError::InputNotFound(_) => None,
        }
    }
}

impl From<ParseError> for ConvertError {
    fn from(err: ParseError) -> Self {
        ConvertError::Parse(err)
    }
}

impl From<FormatError> for ConvertError {
    fn from(err: FormatError) -> Self {
        ConvertError::Format(err)
    }
}

/// Decode raw input bytes into text.
///
/// A byte order mark (UTF-8, UTF-16 LE or UTF-16 BE) selects the encoding and is removed.
/// Without one the bytes are taken as UTF-8 when valid and as Windows-1252 otherwise, so no
/// input is ever rejected.
pub fn decode_source(data: &[u8]) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        log::debug!("input carries a {} byte order mark", encoding.name());
        let (text, had_errors) = encoding.decode_with_bom_removal(data);
        if had_errors {
            log::warn!("malformed {} sequences replaced with U+FFFD", encoding.name());
        }
        return text.into_owned();
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(data) {
        return text.into_owned();
    }

    log::debug!("input is not UTF-8, decoding as {}", WINDOWS_1252.name());
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(data);
    text.into_owned()
}

/// Primary API for a conversion run
pub struct DocumentLoader {
    registry: FormatRegistry,
}

impl DocumentLoader {
    /// Create a loader with the default formats
    pub fn new() -> Self {
        Self {
            registry: FormatRegistry::default(),
        }
    }

    /// Create a loader whose formats follow `config`
    pub fn with_config(config: &OutputConfig) -> Self {
        Self {
            registry: FormatRegistry::with_config(config),
        }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    // ===== STRING-BASED PROCESSING (core methods) =====

    /// Parse source text into a document
    pub fn parse(&self, source: &str) -> Result<Document, ConvertError> {
        Ok(parse_str(source)?)
    }

    /// Parse source text and serialize it with the named format
    pub fn convert(&self, source: &str, format: &str) -> Result<String, ConvertError> {
        let doc = self.parse(source)?;
        Ok(self.registry.serialize(&doc, format)?)
    }

    // ===== FILE-BASED PROCESSING (convenience wrappers) =====

    /// Read and decode a file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<String, ConvertError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConvertError::InputNotFound(path.to_path_buf()));
        }

        let data = fs::read(path).map_err(|source| ConvertError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(decode_source(&data))
    }

    /// Read a file and parse it
    pub fn load_and_parse(&self, path: impl AsRef<Path>) -> Result<Document, ConvertError> {
        let source = self.load(path)?;
        self.parse(&source)
    }

    /// Convert `input` into `output` using the named format.
    ///
    /// `output` is created or overwritten only once the whole document has been serialized.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        format: &str,
    ) -> Result<(), ConvertError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let formatter = self.registry.resolve(format)?;
        let doc = self.load_and_parse(input)?;
        if doc.is_empty() {
            log::info!("{} holds no items", input.display());
        }
        let serialized = formatter.serialize(&doc)?;

        fs::write(output, serialized.as_bytes()).map_err(|source| {
            ConvertError::OutputWriteFailure {
                path: output.to_path_buf(),
                source,
            }
        })?;

        log::info!(
            "converted {} ({} sections) to {} as {format}",
            input.display(),
            doc.sections().len(),
            output.display()
        );
        Ok(())
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
