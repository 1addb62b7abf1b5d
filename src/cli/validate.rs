use anyhow::Result;
use log::info;
use std::path::PathBuf;

use movieinfo::validator::validate_movie_info_file;

/// Validate a movieInfo MAT-file
pub fn run(file: PathBuf) -> Result<()> {
    info!("movieInfo Validator");
    info!("File: {}", file.display());

    match validate_movie_info_file(&file) {
        Ok(report) => {
            println!("{}", report.format_colored());

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
