//! # Conversion pipeline
//!
//! Chains the stages into a one-shot file conversion:
//!
//! ```text
//! localisation file -> LocalisationTable -> FrameBucketMap -> MovieInfoArray -> MAT-file
//! ```
//!
//! Every stage runs to completion on the whole in-memory table before the
//! next one starts. Nothing is written unless every stage succeeds.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::formats::LocalisationFormat;
use crate::localisation::{LocalisationTable, UnitConversion};
use crate::mat::{write_movie_info_file, MatWriterConfig};
use crate::movie_info::{FrameBucketMap, MovieInfoArray};

mod error;
mod stats;


pub use error::ConversionError;
pub use stats::ConversionStats;

/// Suffix appended to the input stem to name the default output
pub const OUTPUT_SUFFIX: &str = "_movieInfo.mat";

/// Options for a file conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionOptions {
    /// Dialect of the input file
    pub format: LocalisationFormat,
    /// Pixel size and photon conversion
    pub units: UnitConversion,
    /// Output container settings
    pub mat: MatWriterConfig,
}

impl ConversionOptions {
    /// Default units and an uncompressed output for `format`
    pub fn new(format: LocalisationFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Set the length of one pixel in input units
    pub fn with_pixel_size(mut self, pixel_size: f64) -> Self {
        self.units.pixel_size = pixel_size;
        self
    }

    /// Set the camera counts per photon (rapidSTORM only)
    pub fn with_photon_conversion(mut self, photon_conversion: f64) -> Self {
        self.units.photon_conversion = photon_conversion;
        self
    }

    /// Store the variable zlib-compressed
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.mat.compress = compress;
        self
    }

    /// Check the numeric parameters before any file is touched.
    pub fn validate(&self) -> Result<(), ConversionError> {
        self.units.validate().map_err(ConversionError::InvalidParameter)
    }
}

/// Assemble a normalised table into the movieInfo structure.
pub fn convert_table(table: &LocalisationTable) -> Result<MovieInfoArray, ConversionError> {
    let buckets = FrameBucketMap::from_table(table)?;
    debug!(
        "Grouped {} localisations into {} populated frames",
        buckets.total_rows(),
        buckets.len()
    );
    Ok(MovieInfoArray::build(&buckets)?)
}

/// Convert `input` into a movieInfo MAT-file at `output`.
///
/// Parameters are checked first; a failure at any stage leaves `output`
/// untouched.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConversionOptions,
) -> Result<ConversionStats, ConversionError> {
    options.validate()?;
    let (input, output) = (input.as_ref(), output.as_ref());

    let table = options.format.read_with_units(input, &options.units)?;
    let movie = convert_table(&table)?;
    let output_bytes = write_movie_info_file(output, &movie, &options.mat)?;

    let stats = ConversionStats::from_movie(&movie, output_bytes);
    info!("{} to {}", stats, output.display());
    Ok(stats)
}

/// `<stem>_movieInfo.mat` next to `input`.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}
