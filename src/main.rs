//! # movieInfo Converter
//!
//! A command-line tool for converting single-molecule localisation files into
//! the movieInfo MAT-files read by the u-track tracker.
//!
//! ## Supported Input Formats
//!
//! - **xyt** (0): tab-separated table with `x`, `y` and `frame` columns
//! - **rapidSTORM** (1): rapidSTORM localisation output
//! - **thunderstorm** (2): xyt table with `uncertainty` and `intensity [photon]`
//!
//! ## Usage
//!
//! ```bash
//! # Convert an xyt table, writing cells_movieInfo.mat
//! movieinfo-convert convert cells.txt
//!
//! # rapidSTORM input in nanometres with 106 nm pixels
//! movieinfo-convert convert -t rapidSTORM -p 106 storm.txt -o storm.mat
//!
//! # Check the result
//! movieinfo-convert validate storm.mat
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
