//! TOML configuration file support.
//!
//! Settings shared across many conversions can live in a config file:
//!
//! ```toml
//! # movieinfo.toml
//! [conversion]
//! format = "rapidSTORM"
//! pixel_size = 106.0
//! photon_conversion = 9.6
//! compress = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use movieinfo::formats::LocalisationFormat;

/// Root configuration structure for movieinfo.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Configuration for the convert command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Input type, by name or discriminator ("xyt", "1", ...).
    pub format: Option<String>,

    /// Pixel size in the unit of the input coordinates.
    pub pixel_size: Option<f64>,

    /// Camera counts per photon (rapidSTORM).
    pub photon_conversion: Option<f64>,

    /// Store the movieInfo variable zlib-compressed.
    pub compress: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ConversionConfig {
    /// The configured input type, if any.
    pub fn format(&self) -> Result<Option<LocalisationFormat>> {
        self.format
            .as_deref()
            .map(|f| f.parse().context("Invalid format in config file"))
            .transpose()
    }
}
