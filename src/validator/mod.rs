//! # movieInfo validation
//!
//! Integrity checks for MAT-files holding a u-track `movieInfo` structure,
//! whether written by this crate or elsewhere.
//!
//! ## Checklist
//!
//! 1. **Structure**: the file decodes as a Level 5 MAT-file and holds a
//!    `movieInfo` struct array with `xCoord`, `yCoord` and `amp` fields.
//! 2. **Frames**: every field of every frame is an `N x 2` double matrix or
//!    empty, the three fields agree on `N`, and the values are finite.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use movieinfo::validator::validate_movie_info_file;
//! use std::path::Path;
//!
//! let report = validate_movie_info_file(Path::new("cells_movieInfo.mat"))?;
//! println!("{}", report);
//! # Ok::<(), movieinfo::validator::ValidationError>(())
//! ```

use std::path::Path;

use log::debug;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod data;
mod report;
mod structure;


/// Errors that stop validation before a report can be produced
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Validate a movieInfo MAT-file.
///
/// Problems with the file content are recorded as failed checks in the
/// report, undecodable files included. Only a file that exists but cannot
/// be opened is an error.
pub fn validate_movie_info_file(path: &Path) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(path.display().to_string());

    // 1. Structure
    if let Some(movie_info) = structure::check_structure(path, &mut report)? {
        // 2. Frames
        data::check_frames(&movie_info, &mut report);
    }

    debug!(
        "Validated {}: {} passed, {} warnings, {} failed",
        path.display(),
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    Ok(report)
}
