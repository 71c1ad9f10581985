//! CLI enum types.

use clap::ValueEnum;

use crate::mood::MoodPreset;
use crate::pipeline::RenderMode;

/// Which layers to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Ascii,
    Overlay,
    Both,
}

impl From<Mode> for RenderMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Ascii => RenderMode::Ascii,
            Mode::Overlay => RenderMode::Overlay,
            Mode::Both => RenderMode::Both,
        }
    }
}

/// Mood tuning to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Confidence gate 0.8, step 4, fearful and disgusted ignored
    Standard,
    /// Standard without the confidence gate
    Open,
    /// No gate, no exclusions, step 1
    Early,
}

impl From<Preset> for MoodPreset {
    fn from(p: Preset) -> Self {
        match p {
            Preset::Standard => MoodPreset::Standard,
            Preset::Open => MoodPreset::Open,
            Preset::Early => MoodPreset::Early,
        }
    }
}
