//! # movieInfo assembly
//!
//! Turns a [`LocalisationTable`](crate::localisation::LocalisationTable) into
//! the structure consumed by the u-track tracker:
//!
//! 1. [`FrameBucketMap::from_table`] groups emission tuples by frame.
//! 2. [`MovieInfoArray::build`] expands the buckets into one slot per frame in
//!    `0..=max_frame`. Frames without detections get empty `f64` sequences.
//!
//! Frame numbers index the array directly, so input frames must be counted
//! from 0. A file counting from 1 yields an empty first slot.

mod buckets;
mod builder;
mod error;

#[cfg(test)]
mod tests;

pub use buckets::{Emission, FrameBucketMap};
pub use builder::{DetectionPair, FrameSlot, MovieInfoArray, MAX_FRAME};
pub use error::MovieInfoError;

/// Name of the MAT-file variable holding the structure
pub const MOVIE_INFO_VARIABLE: &str = "movieInfo";

/// Struct field names, in declaration order
pub const MOVIE_INFO_FIELDS: [&str; 3] = ["xCoord", "yCoord", "amp"];
