use log::{debug, warn};

use super::buckets::{Emission, FrameBucketMap};
use super::MovieInfoError;

/// Largest frame a movieInfo array can hold; MAT dimensions are `i32`
pub const MAX_FRAME: u32 = i32::MAX as u32 - 1;

/// Per-detection `(value, companion)` pair, e.g. `(x, x_uncertainty)`
pub type DetectionPair = [f64; 2];

/// Detections of one frame as three parallel pair sequences.
///
/// A frame without detections holds three empty `f64` sequences, which the
/// tracker reads as "no data"; a zero would be read as a real detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSlot {
    /// `(x, x_uncertainty)` per detection
    pub x_coord: Vec<DetectionPair>,
    /// `(y, y_uncertainty)` per detection
    pub y_coord: Vec<DetectionPair>,
    /// `(amplitude, 0)` per detection
    pub amp: Vec<DetectionPair>,
}

impl FrameSlot {
    /// Slot of a frame without detections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Split emission tuples into the three pair sequences, keeping order.
    pub fn from_emissions(emissions: &[Emission]) -> Self {
        Self {
            x_coord: emissions.iter().map(|e| [e.x, e.x_uncertainty]).collect(),
            y_coord: emissions.iter().map(|e| [e.y, e.y_uncertainty]).collect(),
            amp: emissions.iter().map(|e| [e.amplitude, e.placeholder]).collect(),
        }
    }

    /// Number of detections in the frame
    pub fn detections(&self) -> usize {
        self.x_coord.len()
    }

    /// True when the frame has no detections
    pub fn is_empty(&self) -> bool {
        self.x_coord.is_empty()
    }
}

/// Dense per-frame detection array, one slot for every frame in
/// `0..=max_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInfoArray {
    slots: Vec<FrameSlot>,
}

impl MovieInfoArray {
    /// Expand a bucket map into a dense array.
    ///
    /// Fails with [`MovieInfoError::EmptyInput`] when the map has no frames,
    /// and with [`MovieInfoError::ConversionFailure`] when `max_frame` is past
    /// [`MAX_FRAME`] or the slots cannot be allocated.
    pub fn build(buckets: &FrameBucketMap) -> Result<Self, MovieInfoError> {
        let max_frame = buckets.max_frame().ok_or(MovieInfoError::EmptyInput)?;
        if max_frame > MAX_FRAME {
            return Err(MovieInfoError::ConversionFailure {
                frame: max_frame,
                message: format!("frame index exceeds the largest movieInfo frame {}", MAX_FRAME),
            });
        }
        let len = max_frame as usize + 1;

        let mut slots: Vec<FrameSlot> = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|e| MovieInfoError::ConversionFailure {
                frame: max_frame,
                message: format!("cannot allocate {} frame slots: {}", len, e),
            })?;
        slots.extend((0..=max_frame).map(|frame| {
            buckets
                .get(frame)
                .map_or_else(FrameSlot::empty, FrameSlot::from_emissions)
        }));

        let array = Self { slots };
        if array.slots.first().is_some_and(FrameSlot::is_empty) {
            warn!("Frame 0 has no localisations; frames are expected to be counted from 0");
        }
        debug!(
            "Built movieInfo with {} frames ({} empty)",
            array.len(),
            array.empty_frames()
        );
        Ok(array)
    }

    /// Wrap prepared slots, e.g. read back from a file.
    pub fn from_slots(slots: Vec<FrameSlot>) -> Self {
        Self { slots }
    }

    /// Slots in frame order
    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    /// Slot of `frame`
    pub fn get(&self, frame: usize) -> Option<&FrameSlot> {
        self.slots.get(frame)
    }

    /// Number of frames, `max_frame + 1`
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the array has no frames
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Largest frame index
    pub fn max_frame(&self) -> Option<usize> {
        self.slots.len().checked_sub(1)
    }

    /// Number of frames without detections
    pub fn empty_frames(&self) -> usize {
        self.slots.iter().filter(|s| s.is_empty()).count()
    }

    /// Total detections over all frames
    pub fn total_detections(&self) -> usize {
        self.slots.iter().map(FrameSlot::detections).sum()
    }
}
