//! # Localisation tables
//!
//! In-memory representation of the particle localisations read from one
//! input file, independent of the dialect it was written in.
//!
//! A [`LocalisationTable`] is always sorted by ascending frame and carries a
//! two-level [`FrameIndex`] (`frame_<n>`, position within the frame) for each
//! row. Readers in [`crate::formats`] build tables and pass them through
//! [`normalize`] to express positions in pixels and amplitudes in photons.

mod index;
mod normalize;
mod types;

#[cfg(test)]
mod tests;

pub use index::{frame_index, FrameIndex};
pub use normalize::{normalize, UnitConversion};
pub use types::{LocalisationRow, LocalisationTable};
