//! thunderSTORM-style tables.
//!
//! Same layout as [`super::xyt`], with the optional `uncertainty` and
//! `intensity [photon]` columns feeding the positional uncertainty and the
//! amplitude. Both columns are used together: if either is missing, every
//! row falls back to uncertainty 0 and amplitude 1.

use std::io::BufRead;

use super::xyt::read_tabular;
use super::FormatError;
use crate::localisation::LocalisationTable;

/// Read a thunderSTORM-style table and scale positions by `pixel_size`.
pub fn read_thunderstorm<R: BufRead>(
    reader: R,
    pixel_size: f64,
) -> Result<LocalisationTable, FormatError> {
    read_tabular(reader, pixel_size, true)
}
