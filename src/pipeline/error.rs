use crate::formats::FormatError;
use crate::mat::MatError;
use crate::movie_info::MovieInfoError;

/// Errors from any stage of a file conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Reading or parsing the localisation file failed
    #[error("Input error: {0}")]
    Format(#[from] FormatError),

    /// The table could not be assembled into movieInfo
    #[error("movieInfo error: {0}")]
    MovieInfo(#[from] MovieInfoError),

    /// Writing the MAT-file failed
    #[error("Output error: {0}")]
    Mat(#[from] MatError),

    /// Pixel size or photon conversion out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
