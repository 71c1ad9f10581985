//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Mode, Preset};

/// Mood mirror: face expressions drive an ASCII video overlay and a playlist
#[derive(Parser, Debug)]
#[command(name = "mood-mirror")]
#[command(version, about = "Expression-driven ASCII mirror", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded session through the pipeline
    Run(RunArgs),
    /// Print the mood profile table
    Profiles,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Recorded detections, one JSON array of faces per line
    #[arg(long, short)]
    pub detections: PathBuf,

    /// Directory of video frames (default: black frames)
    #[arg(long, short)]
    pub frames: Option<PathBuf>,

    /// Restart the frames from the beginning when they run out
    #[arg(long)]
    pub loop_frames: bool,

    /// Write every presented canvas as a PNG into this directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Draw the ASCII preview and status line in the terminal
    #[arg(long)]
    pub preview: bool,

    /// Layers to draw
    #[arg(long, short)]
    pub mode: Option<Mode>,

    /// Directory holding the tracking icons
    #[arg(long)]
    pub icons: Option<PathBuf>,

    /// Minimum milliseconds between ticks
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many ticks (default: length of the recording)
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Mood tuning preset
    #[arg(long, short)]
    pub preset: Option<Preset>,

    /// Accept readings of any confidence
    #[arg(long)]
    pub no_gate: bool,

    /// Do not mirror frames horizontally
    #[arg(long)]
    pub no_mirror: bool,

    /// Seed for glyph selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the status line in the preview
    #[arg(long)]
    pub no_status: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
