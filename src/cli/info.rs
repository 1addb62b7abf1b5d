use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use movieinfo::formats::LocalisationFormat;
use movieinfo::localisation::UnitConversion;
use movieinfo::mat::read_movie_info;

/// Display information about a localisation file or a movieInfo MAT-file
pub fn run(file: PathBuf, format: LocalisationFormat, pixel_size: f64) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    if is_mat_file(&file) {
        mat_info(&file)
    } else {
        localisation_info(&file, format, pixel_size)
    }
}

fn is_mat_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mat"))
}

fn mat_info(file: &Path) -> Result<()> {
    let movie = read_movie_info(file).context("Failed to read movieInfo MAT-file")?;

    println!("movieInfo File Information");
    println!("==========================");
    println!("File: {}", file.display());
    println!();
    println!("  Frames: {}", movie.len());
    println!("  Empty frames: {}", movie.empty_frames());
    println!("  Detections: {}", movie.total_detections());

    let busiest = movie
        .slots()
        .iter()
        .enumerate()
        .max_by_key(|(_, slot)| slot.detections());
    if let Some((frame, slot)) = busiest.filter(|(_, slot)| !slot.is_empty()) {
        println!("  Busiest frame: {} ({} detections)", frame, slot.detections());
    }

    Ok(())
}

fn localisation_info(file: &Path, format: LocalisationFormat, pixel_size: f64) -> Result<()> {
    let units = UnitConversion::pixels(pixel_size);
    units
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid pixel size")?;
    let table = format
        .read_with_units(file, &units)
        .with_context(|| format!("Failed to read {} file", format))?;

    println!("Localisation File Information");
    println!("=============================");
    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!();
    println!("  Detections: {}", table.len());

    if let (Some(min), Some(max)) = (table.min_frame(), table.max_frame()) {
        let populated = table.frame_count();
        let span = (max - min) as usize + 1;
        println!("  Frame range: {}..={}", min, max);
        println!("  Populated frames: {}", populated);
        println!("  Empty frames in range: {}", span - populated);
        if min != 0 {
            println!("  Note: first frame is {}; movieInfo slots count from 0", min);
        }
    }

    println!(
        "  Signal-to-noise: {}",
        if table.has_signal_to_noise() {
            "available"
        } else {
            "not available"
        }
    );
    if !table.extra_columns().is_empty() {
        println!("  Extra columns: {}", table.extra_columns().join(", "));
    }

    Ok(())
}
