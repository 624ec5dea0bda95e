//! Percept CLI — Replay recorded perception signals through the engines.
//!
//! Usage:
//!   percept level <LANDMARKS>      Pinch-to-level replay (volume, brightness)
//!   percept pointer <LANDMARKS>    Virtual pointer replay
//!   percept detect <CANDIDATES>    Object detection replay (primary path)
//!   percept motion <FRAMES>...     Motion detection over images (fallback path)
//!   percept config                 Show the effective configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use percept_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "percept",
    about = "Turn hand landmarks and detector output into stable controls",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Calibration preset for the `level` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    Volume,
    Brightness,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the thumb-index pinch of each frame onto a level
    Level {
        /// Landmark recording (JSONL, one frame per line)
        path: PathBuf,

        /// Calibration preset
        #[arg(long, value_enum, default_value = "volume")]
        preset: Preset,

        /// Damping divisor for the pinch distance (1 = none)
        #[arg(long, default_value = "1.0")]
        smoothing: f64,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Drive the virtual pointer from recorded landmarks
    Pointer {
        /// Landmark recording (JSONL, one frame per line)
        path: PathBuf,

        /// Screen width in pixels
        #[arg(long, default_value = "1920")]
        screen_width: u32,

        /// Screen height in pixels
        #[arg(long, default_value = "1080")]
        screen_height: u32,

        /// Click once per pinch instead of every pinched frame
        #[arg(long)]
        edge: bool,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Suppress and label recorded detector candidates
    Detect {
        /// Candidate recording (JSONL, one frame per line)
        path: PathBuf,

        /// Class label file (one name per line); overrides the config
        #[arg(short, long)]
        labels: Option<PathBuf>,
    },

    /// Report moving regions across a sequence of images
    Motion {
        /// Image files; the first becomes the background reference
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// Gaussian pre-blur sigma; overrides the config
        #[arg(long)]
        blur: Option<f32>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the standard location
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };
    config.validate().context("Invalid configuration")?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    percept_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Level {
            path,
            preset,
            smoothing,
            json,
        } => commands::level::run(&config, path, preset, smoothing, json),
        Commands::Pointer {
            path,
            screen_width,
            screen_height,
            edge,
            json,
        } => commands::pointer::run(&config, path, screen_width, screen_height, edge, json),
        Commands::Detect { path, labels } => commands::detect::run(&config, path, labels),
        Commands::Motion { frames, blur } => commands::motion::run(&config, frames, blur),
        Commands::Config { save } => commands::config::run(&config, save),
    }
}
