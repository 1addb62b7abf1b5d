use super::index::{frame_index, FrameIndex};

/// One detected particle in one acquisition frame.
///
/// Coordinates are in pixel units once the table has been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalisationRow {
    /// Acquisition frame (0-based by convention, see [`crate::movie_info`])
    pub frame: u32,
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Uncertainty of the x position (0 when unavailable)
    pub x_uncertainty: f64,
    /// Uncertainty of the y position (0 when unavailable)
    pub y_uncertainty: f64,
    /// Fitted amplitude in photons (placeholder 1 when unavailable)
    pub amplitude: f64,
    /// Local background intensity under the fit, in raw camera units
    pub local_background: Option<f64>,
    /// Amplitude divided by local background
    pub signal_to_noise: Option<f64>,
    /// Fit residue reported by the localisation software
    pub fit_residue: Option<f64>,
    /// PSF widths along x and y
    pub psf_width: Option<(f64, f64)>,
    /// Pass-through values, aligned with [`LocalisationTable::extra_columns`]
    pub extra: Vec<f64>,
}

impl LocalisationRow {
    /// Create a row carrying only a position; uncertainties are zero and the
    /// amplitude is the placeholder weight 1.
    pub fn new(frame: u32, x: f64, y: f64) -> Self {
        Self {
            frame,
            x,
            y,
            x_uncertainty: 0.0,
            y_uncertainty: 0.0,
            amplitude: 1.0,
            local_background: None,
            signal_to_noise: None,
            fit_residue: None,
            psf_width: None,
            extra: Vec::new(),
        }
    }

    /// Set both positional uncertainties
    pub fn with_uncertainty(mut self, x_uncertainty: f64, y_uncertainty: f64) -> Self {
        self.x_uncertainty = x_uncertainty;
        self.y_uncertainty = y_uncertainty;
        self
    }

    /// Set the amplitude
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the local background
    pub fn with_local_background(mut self, background: f64) -> Self {
        self.local_background = Some(background);
        self
    }
}

/// Localisations of one input file, ordered by ascending frame.
///
/// Construction stably sorts the rows and derives the [`FrameIndex`] of every
/// row, so the ordering and indexing invariants hold for every table value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalisationTable {
    rows: Vec<LocalisationRow>,
    index: Vec<FrameIndex>,
    extra_columns: Vec<String>,
}

impl LocalisationTable {
    /// Build a table from rows in source order.
    ///
    /// Rows are stably sorted by frame; rows sharing a frame keep their source
    /// order.
    pub fn new(mut rows: Vec<LocalisationRow>, extra_columns: Vec<String>) -> Self {
        rows.sort_by_key(|row| row.frame);
        let index = frame_index(rows.iter().map(|row| row.frame));
        Self {
            rows,
            index,
            extra_columns,
        }
    }

    /// Rows in frame order
    pub fn rows(&self) -> &[LocalisationRow] {
        &self.rows
    }

    /// Frame index, parallel to [`Self::rows`]
    pub fn index(&self) -> &[FrameIndex] {
        &self.index
    }

    /// Iterate over `(index, row)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&FrameIndex, &LocalisationRow)> {
        self.index.iter().zip(self.rows.iter())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names of the pass-through columns
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Largest frame number, if any rows exist
    pub fn max_frame(&self) -> Option<u32> {
        self.rows.last().map(|row| row.frame)
    }

    /// Smallest frame number, if any rows exist
    pub fn min_frame(&self) -> Option<u32> {
        self.rows.first().map(|row| row.frame)
    }

    /// Number of distinct frames with at least one row
    pub fn frame_count(&self) -> usize {
        self.index.iter().filter(|idx| idx.sequence == 0).count()
    }

    /// Whether any row carries a signal-to-noise value
    pub fn has_signal_to_noise(&self) -> bool {
        self.rows.iter().any(|row| row.signal_to_noise.is_some())
    }

    /// Values of a named column.
    ///
    /// Core columns are addressed by `frame`, `x`, `y`, `x_uncertainty`,
    /// `y_uncertainty`, `amplitude`, `snr` and `fit_residue`; any other name
    /// is looked up among the pass-through columns. Optional core columns
    /// yield NaN for rows that lack a value.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let pick: fn(&LocalisationRow) -> f64 = match name {
            "frame" => |r: &LocalisationRow| f64::from(r.frame),
            "x" => |r: &LocalisationRow| r.x,
            "y" => |r: &LocalisationRow| r.y,
            "x_uncertainty" => |r: &LocalisationRow| r.x_uncertainty,
            "y_uncertainty" => |r: &LocalisationRow| r.y_uncertainty,
            "amplitude" => |r: &LocalisationRow| r.amplitude,
            "snr" => |r: &LocalisationRow| r.signal_to_noise.unwrap_or(f64::NAN),
            "fit_residue" => |r: &LocalisationRow| r.fit_residue.unwrap_or(f64::NAN),
            _ => {
                let position = self.extra_columns.iter().position(|c| c == name)?;
                return Some(
                    self.rows
                        .iter()
                        .map(|row| row.extra.get(position).copied().unwrap_or(f64::NAN))
                        .collect(),
                );
            }
        };
        Some(self.rows.iter().map(pick).collect())
    }

    /// Keep only rows matching `predicate`; the frame index is rebuilt.
    pub fn retain<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&LocalisationRow) -> bool,
    {
        let rows = self.rows.into_iter().filter(|row| predicate(row)).collect();
        Self::new(rows, self.extra_columns)
    }

    /// Apply a per-row transform that leaves `frame` untouched.
    pub(crate) fn map_rows<F>(self, f: F) -> Self
    where
        F: FnMut(LocalisationRow) -> LocalisationRow,
    {
        let rows: Vec<_> = self.rows.into_iter().map(f).collect();
        debug_assert!(rows.iter().zip(&self.index).all(|(r, i)| r.frame == i.frame));
        Self {
            rows,
            index: self.index,
            extra_columns: self.extra_columns,
        }
    }
}
