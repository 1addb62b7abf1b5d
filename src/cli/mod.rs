use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use movieinfo::formats::LocalisationFormat;

mod config;
mod convert;
mod info;
mod validate;

/// movieinfo - convert localisation files into u-track movieInfo MAT-files
#[derive(Parser)]
#[command(name = "movieinfo-convert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a localisation file to a movieInfo MAT-file
    Convert {
        /// Input localisation file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output MAT-file (defaults to <INPUT stem>_movieInfo.mat)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Input type: 0/xyt, 1/rapidSTORM, 2/thunderstorm (default: xyt)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        format: Option<LocalisationFormat>,

        /// Pixel size in the unit of the input coordinates (default: 1.0)
        #[arg(short, long)]
        pixel_size: Option<f64>,

        /// Camera counts per photon, rapidSTORM only (default: 1.0)
        #[arg(long)]
        photon_conversion: Option<f64>,

        /// Store the movieInfo variable zlib-compressed
        #[arg(long)]
        compress: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Summarise a localisation file or a movieInfo MAT-file
    Info {
        /// Localisation file or .mat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input type for localisation files (default: xyt)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        format: Option<LocalisationFormat>,

        /// Pixel size for localisation files
        #[arg(short, long, default_value_t = 1.0)]
        pixel_size: f64,
    },

    /// Validate a movieInfo MAT-file
    Validate {
        /// MAT-file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            pixel_size,
            photon_conversion,
            compress,
            config,
        } => convert::run(
            input,
            output,
            convert::Overrides {
                format,
                pixel_size,
                photon_conversion,
                compress,
            },
            config,
        ),
        Commands::Info {
            file,
            format,
            pixel_size,
        } => info::run(file, format.unwrap_or_default(), pixel_size),
        Commands::Validate { file } => validate::run(file),
    }
}
