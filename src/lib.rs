//! # movieinfo - localisation files to u-track movieInfo
//!
//! `movieinfo` converts single-molecule localisation tables into the
//! per-frame `movieInfo` structure that the u-track tracker loads from a
//! MATLAB MAT-file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use movieinfo::formats::LocalisationFormat;
//! use movieinfo::pipeline::{convert_file, default_output_path, ConversionOptions};
//!
//! let options = ConversionOptions::new(LocalisationFormat::RapidStorm)
//!     .with_pixel_size(106.0)
//!     .with_photon_conversion(9.6);
//!
//! let stats = convert_file("cells.txt", default_output_path("cells.txt"), &options)?;
//! println!("{}", stats);
//! # Ok::<(), movieinfo::pipeline::ConversionError>(())
//! ```
//!
//! ## Input dialects
//!
//! | Discriminator | Dialect | Header | Photometry |
//! |---------------|---------|--------|------------|
//! | 0 | xyt | tab-separated `x`, `y`, `frame` | placeholders |
//! | 1 | rapidSTORM | `# <localizations>` XML field list | amplitude, SNR |
//! | 2 | thunderstorm | as xyt, plus `uncertainty`, `intensity [photon]` | when present |
//!
//! ## Output
//!
//! A `(max_frame + 1) x 1` struct array named `movieInfo`. Slot `i` holds
//! frame `i`; its `xCoord`, `yCoord` and `amp` fields are `N x 2` double
//! matrices of `[value, uncertainty]` rows, or `[]` for frames without
//! detections.
//!
//! ## Architecture
//!
//! - [`formats`]: dialect readers producing a [`localisation::LocalisationTable`]
//! - [`localisation`]: the normalised table, frame index and unit conversion
//! - [`movie_info`]: frame bucketing and dense movieInfo assembly
//! - [`mat`]: Level 5 MAT-file writer and reader
//! - [`pipeline`]: one-shot file conversion
//! - [`validator`]: integrity checks for movieInfo MAT-files

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod formats;
pub mod localisation;
pub mod mat;
pub mod movie_info;
pub mod pipeline;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::formats::{FormatError, LocalisationFormat};
    pub use crate::localisation::{LocalisationRow, LocalisationTable, UnitConversion};
    pub use crate::mat::{read_movie_info, MatError, MatWriter, MatWriterConfig};
    pub use crate::movie_info::{FrameSlot, MovieInfoArray, MovieInfoError};
    pub use crate::pipeline::{
        convert_file, convert_table, default_output_path, ConversionError, ConversionOptions,
        ConversionStats,
    };
    pub use crate::validator::{validate_movie_info_file, ValidationReport};
}
