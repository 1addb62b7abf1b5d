use log::{debug, warn};

use super::types::LocalisationTable;

/// Unit conversion factors applied to a freshly parsed table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    /// Physical size of one camera pixel, in the unit of the source coordinates.
    /// Positions are divided by this value; 1.0 is a no-op.
    pub pixel_size: f64,
    /// Camera counts per photon. Amplitudes are divided by this value.
    pub photon_conversion: f64,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self {
            pixel_size: 1.0,
            photon_conversion: 1.0,
        }
    }
}

impl UnitConversion {
    /// Create a conversion with both factors
    pub fn new(pixel_size: f64, photon_conversion: f64) -> Self {
        Self {
            pixel_size,
            photon_conversion,
        }
    }

    /// Spatial scaling only; amplitudes pass through unchanged
    pub fn pixels(pixel_size: f64) -> Self {
        Self {
            pixel_size,
            ..Default::default()
        }
    }

    /// Check that both factors are usable divisors
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("pixel size", self.pixel_size),
            ("photon conversion", self.photon_conversion),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Convert a table into pixel and photon units.
///
/// For every row, the signal-to-noise ratio is computed from the raw amplitude
/// when a local background is known, then `amplitude /= photon_conversion`
/// and `x, y /= pixel_size`. Rows without a background keep `signal_to_noise`
/// unset. A zero background yields a non-finite ratio, which is kept as is.
///
/// Uncertainties are left in source units.
pub fn normalize(table: LocalisationTable, units: &UnitConversion) -> LocalisationTable {
    let UnitConversion {
        pixel_size,
        photon_conversion,
    } = *units;

    let mut non_finite_snr = 0usize;
    let table = table.map_rows(|mut row| {
        if let Some(background) = row.local_background {
            let snr = row.amplitude / background;
            if !snr.is_finite() {
                non_finite_snr += 1;
            }
            row.signal_to_noise = Some(snr);
        }
        row.amplitude /= photon_conversion;
        row.x /= pixel_size;
        row.y /= pixel_size;
        row
    });

    if non_finite_snr > 0 {
        warn!(
            "{} localisations have a non-finite signal-to-noise ratio (zero local background)",
            non_finite_snr
        );
    }
    debug!(
        "Normalized {} localisations (pixel size {}, photon conversion {})",
        table.len(),
        pixel_size,
        photon_conversion
    );

    table
}
