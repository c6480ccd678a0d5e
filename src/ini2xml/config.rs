//! Configuration loading
//!
//! `defaults/ini2xml.default.toml` is embedded into the binary and forms the base layer.
//! Callers layer user files and single-key overrides on top of it via [`ConfigLoader`] before
//! deserializing into [`ConverterConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/ini2xml.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConverterConfig {
    pub output: OutputConfig,
}

/// Output selection and presentation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Formatter used when none is requested explicitly
    pub format: String,
    pub xml: XmlOutputConfig,
}

/// Knobs of the XML writer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct XmlOutputConfig {
    pub declaration: bool,
    pub indent_size: usize,
    pub indent_with_tabs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "xml".to_string(),
            xml: XmlOutputConfig::default(),
        }
    }
}

impl Default for XmlOutputConfig {
    fn default() -> Self {
        Self {
            declaration: true,
            indent_size: 2,
            indent_with_tabs: false,
        }
    }
}

/// Stacks configuration layers, later layers winning key by key.
///
/// The embedded defaults are always the bottom layer.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Stack a TOML file on top. A missing file fails at [`ConfigLoader::build`].
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        let layer = File::from(path.as_ref()).format(FileFormat::Toml);
        Self {
            builder: self.builder.add_source(layer),
        }
    }

    /// Pin `key` (dotted path, e.g. `output.format`) regardless of the file layers.
    pub fn set_override<I>(self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        Ok(Self {
            builder: self.builder.set_override(key, value)?,
        })
    }

    pub fn build(self) -> Result<ConverterConfig, ConfigError> {
        let config: ConverterConfig = self.builder.build()?.try_deserialize()?;
        log::debug!("resolved configuration: {config:?}");
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
