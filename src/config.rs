//! Configuration file handling for mood-mirror.
//!
//! Loads configuration from `~/.config/mood-mirror/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::ascii::{CellGeometry, GlyphRange};
use crate::mood::{MoodLabel, MoodPreset, MoodSettings};
use crate::pipeline::{PipelineSettings, RenderMode};
use crate::player::PlayerWidget;
use crate::scheduler::SchedulerSettings;

/// Configuration file structure for mood-mirror.
///
/// Every field is optional in the file; missing values fall back to the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mood: MoodConfig,
    pub scheduler: SchedulerConfig,
    pub ascii: AsciiConfig,
    pub overlay: OverlayConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
}

/// Mood tuning: a preset, with any field set here taking precedence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub preset: MoodPreset,
    /// Confidence a reading must exceed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_progress: Option<u8>,
    /// Labels that never drive a transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<MoodLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_ms: u64,
    pub inference_timeout_ms: u64,
    pub mode: RenderMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: SchedulerSettings::DEFAULT_INTERVAL.as_millis() as u64,
            inference_timeout_ms: SchedulerSettings::DEFAULT_INFERENCE_TIMEOUT.as_millis() as u64,
            mode: RenderMode::default(),
            max_ticks: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    pub glyph_min: u32,
    pub glyph_max: u32,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        let cell = CellGeometry::default();
        let glyphs = GlyphRange::default();
        Self {
            cell_width: cell.width,
            cell_height: cell.height,
            glyph_min: glyphs.start,
            glyph_max: glyphs.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Directory holding `halo.png`, `cloud.png`, `exclamation.png`, `devil.png`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub fade_ms: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fade_ms: PlayerWidget::DEFAULT_FADE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Mirror frames horizontally (selfie view)
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { mirror: true }
    }
}

impl Config {
    /// Load configuration from a file path (or the default path).
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Write this config to `path`, creating parent directories.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_new(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn mood_settings(&self) -> MoodSettings {
        let mut settings = self.mood.preset.settings();
        if let Some(gate) = self.mood.gate {
            settings.gate = Some(gate);
        }
        if let Some(step) = self.mood.step {
            settings.step = step;
        }
        if let Some(max) = self.mood.max_progress {
            settings.max_progress = max;
        }
        if let Some(excluded) = &self.mood.excluded {
            settings.excluded = excluded.clone();
        }
        settings
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            mood: self.mood_settings(),
            mode: self.scheduler.mode,
            cell: CellGeometry {
                width: self.ascii.cell_width.max(1),
                height: self.ascii.cell_height.max(1),
            },
            glyphs: GlyphRange {
                start: self.ascii.glyph_min,
                end: self.ascii.glyph_max,
            },
            fade_ms: self.player.fade_ms,
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval: Duration::from_millis(self.scheduler.interval_ms),
            inference_timeout: Duration::from_millis(self.scheduler.inference_timeout_ms),
            max_ticks: self.scheduler.max_ticks,
        }
    }
}

/// Errors that can occur when loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[source] toml::ser::Error),
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("mood-mirror").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/mood-mirror/config.toml")
        })
}
