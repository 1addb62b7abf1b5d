use std::fmt;

use crate::movie_info::MovieInfoArray;

/// Statistics from a completed conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    /// Localisations written
    pub detections: usize,
    /// Length of the movieInfo array, `max_frame + 1`
    pub frames: usize,
    /// Frames without any localisation
    pub empty_frames: usize,
    /// Highest frame number seen
    pub max_frame: usize,
    /// Size of the MAT-file in bytes
    pub output_bytes: u64,
}

impl ConversionStats {
    pub(crate) fn from_movie(movie: &MovieInfoArray, output_bytes: u64) -> Self {
        Self {
            detections: movie.total_detections(),
            frames: movie.len(),
            empty_frames: movie.empty_frames(),
            max_frame: movie.max_frame().unwrap_or(0),
            output_bytes,
        }
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} detections in {} frames ({} empty), {} bytes",
            self.detections, self.frames, self.empty_frames, self.output_bytes
        )
    }
}
