//! Generic xyt tables.
//!
//! The first line is a tab-separated header which must name the columns
//! `x`, `y` and `frame` (case-sensitive). Every other column is kept as a
//! pass-through column for filtering.

use std::io::BufRead;

use log::{debug, info, warn};

use super::tabular::{frame_number, read_header_line, read_numeric_body, split_tab_header};
use super::FormatError;
use crate::localisation::{normalize, LocalisationRow, LocalisationTable, UnitConversion};

/// Column carrying the localisation uncertainty in thunderSTORM exports
pub const UNCERTAINTY_COLUMN: &str = "uncertainty";
/// Column carrying the fitted intensity in thunderSTORM exports
pub const INTENSITY_COLUMN: &str = "intensity [photon]";

/// Positions of the recognised columns within a tabular header
#[derive(Debug, Clone)]
pub(super) struct TabularLayout {
    x: usize,
    y: usize,
    frame: usize,
    /// `(uncertainty, intensity)` positions, only when both are present
    photometry: Option<(usize, usize)>,
    /// `(position, name)` of every pass-through column
    extra: Vec<(usize, String)>,
    width: usize,
}

impl TabularLayout {
    /// Locate columns in `header`. With `photometry` set and both
    /// `uncertainty` and `intensity [photon]` present, those two columns are
    /// consumed. If only one is present, neither is used and it passes
    /// through like any other column.
    pub(super) fn from_header(header: &[String], photometry: bool) -> Result<Self, FormatError> {
        let find = |name: &str| header.iter().position(|c| c == name);
        let require =
            |name: &str| find(name).ok_or_else(|| FormatError::MissingColumn(name.to_string()));

        let x = require("x")?;
        let y = require("y")?;
        let frame = require("frame")?;
        let photometry = if photometry {
            match (find(UNCERTAINTY_COLUMN), find(INTENSITY_COLUMN)) {
                (Some(u), Some(a)) => Some((u, a)),
                (None, None) => None,
                (u, _) => {
                    warn!(
                        "Only '{}' found; both '{}' and '{}' are needed, using placeholder photometry",
                        if u.is_some() { UNCERTAINTY_COLUMN } else { INTENSITY_COLUMN },
                        UNCERTAINTY_COLUMN,
                        INTENSITY_COLUMN
                    );
                    None
                }
            }
        } else {
            None
        };

        let (uncertainty, intensity) = photometry.unzip();
        let consumed = [Some(x), Some(y), Some(frame), uncertainty, intensity];
        let extra = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(&Some(*i)))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        Ok(Self {
            x,
            y,
            frame,
            photometry,
            extra,
            width: header.len(),
        })
    }

    fn row(&self, values: &[f64], line: usize) -> Result<LocalisationRow, FormatError> {
        let frame = frame_number(values[self.frame], line)?;
        let mut row = LocalisationRow::new(frame, values[self.x], values[self.y]);
        if let Some((u, a)) = self.photometry {
            row = row
                .with_uncertainty(values[u], values[u])
                .with_amplitude(values[a]);
        }
        row.extra = self.extra.iter().map(|(i, _)| values[*i]).collect();
        Ok(row)
    }
}

/// Shared body of the xyt and thunderSTORM readers
pub(super) fn read_tabular<R: BufRead>(
    mut reader: R,
    pixel_size: f64,
    photometry: bool,
) -> Result<LocalisationTable, FormatError> {
    let header = split_tab_header(&read_header_line(&mut reader)?)?;
    let layout = TabularLayout::from_header(&header, photometry)?;
    debug!(
        "Header has {} columns ({} pass-through)",
        layout.width,
        layout.extra.len()
    );

    let rows = read_numeric_body(reader, layout.width, 2)?
        .into_iter()
        .map(|r| layout.row(&r.values, r.line))
        .collect::<Result<Vec<_>, _>>()?;

    let extra_columns = layout.extra.iter().map(|(_, name)| name.clone()).collect();
    let table = LocalisationTable::new(rows, extra_columns);
    info!(
        "Read {} localisations in {} frames",
        table.len(),
        table.frame_count()
    );

    Ok(normalize(table, &UnitConversion::pixels(pixel_size)))
}

/// Read a generic xyt table and scale positions by `pixel_size`.
pub fn read_xyt<R: BufRead>(reader: R, pixel_size: f64) -> Result<LocalisationTable, FormatError> {
    read_tabular(reader, pixel_size, false)
}
