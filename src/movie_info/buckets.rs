use std::collections::BTreeMap;

use log::debug;

use super::MovieInfoError;
use crate::localisation::{LocalisationRow, LocalisationTable};

/// Per-detection output tuple
/// `(x, x_uncertainty, y, y_uncertainty, amplitude, placeholder)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    /// Scaled x position
    pub x: f64,
    /// Uncertainty paired with `x`
    pub x_uncertainty: f64,
    /// Scaled y position
    pub y: f64,
    /// Uncertainty paired with `y`
    pub y_uncertainty: f64,
    /// Amplitude, or 1 when the dialect has none
    pub amplitude: f64,
    /// Companion of the amplitude in the `amp` pairs; always 0
    pub placeholder: f64,
}

impl Emission {
    /// Build the tuple for one row. Positions must be finite.
    pub fn from_row(row: &LocalisationRow) -> Result<Self, MovieInfoError> {
        if !row.x.is_finite() || !row.y.is_finite() {
            return Err(MovieInfoError::ConversionFailure {
                frame: row.frame,
                message: format!("non-finite position ({}, {})", row.x, row.y),
            });
        }
        Ok(Self {
            x: row.x,
            x_uncertainty: row.x_uncertainty,
            y: row.y,
            y_uncertainty: row.y_uncertainty,
            amplitude: row.amplitude,
            placeholder: 0.0,
        })
    }
}

/// Emission tuples grouped by frame, in input row order within each frame.
///
/// Frames without detections have no bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBucketMap {
    buckets: BTreeMap<u32, Vec<Emission>>,
}

impl FrameBucketMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Group every row of `table` by frame in a single pass.
    pub fn from_table(table: &LocalisationTable) -> Result<Self, MovieInfoError> {
        let mut map = Self::new();
        for row in table.rows() {
            map.push(row.frame, Emission::from_row(row)?);
        }
        debug!(
            "Bucketed {} localisations into {} frames",
            map.total_rows(),
            map.len()
        );
        Ok(map)
    }

    /// Append an emission to the bucket of `frame`, creating it if needed.
    pub fn push(&mut self, frame: u32, emission: Emission) {
        self.buckets.entry(frame).or_default().push(emission);
    }

    /// Emissions of `frame`, if it has a bucket
    pub fn get(&self, frame: u32) -> Option<&[Emission]> {
        self.buckets.get(&frame).map(Vec::as_slice)
    }

    /// Number of frames with a bucket
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when no frame has a bucket
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of emissions across all buckets
    pub fn total_rows(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Largest frame with a bucket
    pub fn max_frame(&self) -> Option<u32> {
        self.buckets.keys().next_back().copied()
    }

    /// Iterate over `(frame, emissions)` in ascending frame order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Emission])> {
        self.buckets.iter().map(|(frame, e)| (*frame, e.as_slice()))
    }
}
