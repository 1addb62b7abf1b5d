use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use movieinfo::formats::LocalisationFormat;
use movieinfo::pipeline::{convert_file, default_output_path, ConversionOptions};

use super::config::Config;

/// Settings given explicitly on the command line
pub struct Overrides {
    pub format: Option<LocalisationFormat>,
    pub pixel_size: Option<f64>,
    pub photon_conversion: Option<f64>,
    pub compress: bool,
}

/// Command line over config file over defaults
fn resolve_options(overrides: Overrides, config: Option<&Config>) -> Result<ConversionOptions> {
    let mut options = ConversionOptions::default();

    if let Some(config) = config {
        let conversion = &config.conversion;
        if let Some(format) = conversion.format()? {
            options.format = format;
        }
        if let Some(pixel_size) = conversion.pixel_size {
            options.units.pixel_size = pixel_size;
        }
        if let Some(photon_conversion) = conversion.photon_conversion {
            options.units.photon_conversion = photon_conversion;
        }
        if let Some(compress) = conversion.compress {
            options.mat.compress = compress;
        }
    }

    if let Some(format) = overrides.format {
        options.format = format;
    }
    if let Some(pixel_size) = overrides.pixel_size {
        options.units.pixel_size = pixel_size;
    }
    if let Some(photon_conversion) = overrides.photon_conversion {
        options.units.photon_conversion = photon_conversion;
    }
    if overrides.compress {
        options.mat.compress = true;
    }

    options.validate()?;
    Ok(options)
}

/// Convert a localisation file to a movieInfo MAT-file
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    overrides: Overrides,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let config = config_path.as_deref().map(Config::from_file).transpose()?;
    let options = resolve_options(overrides, config.as_ref())?;
    let output = output.unwrap_or_else(|| default_output_path(&input));

    info!("movieInfo Converter - {} to MAT", options.format);
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Pixel size: {}", options.units.pixel_size);
    if options.format == LocalisationFormat::RapidStorm {
        info!("Photon conversion: {}", options.units.photon_conversion);
    }
    if options.mat.compress {
        info!("Compression: zlib");
    }

    let stats = convert_file(&input, &output, &options)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    info!("Conversion complete!");
    info!("  Detections: {}", stats.detections);
    info!(
        "  Frames: {} (0..={}, {} empty)",
        stats.frames, stats.max_frame, stats.empty_frames
    );
    info!("  Output file size: {} bytes", stats.output_bytes);
    println!("{}", output.display());

    Ok(())
}
