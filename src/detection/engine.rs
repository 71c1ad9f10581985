//! Inference engine boundary.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};

use super::snapshot::RawDetection;
use crate::camera::Frame;

/// Errors reported by an inference engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A recording could not be read
    #[error("Failed to read detections from '{}': {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A recorded tick is not valid detection JSON
    #[error("Invalid detection record on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// The engine failed while running inference
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Face detection, landmarks and expression scoring for one frame.
///
/// Called once per tick; every face found is returned, most confident first.
pub trait FaceEngine {
    fn detect(&mut self, frame: &Frame)
        -> impl Future<Output = Result<Vec<RawDetection>, EngineError>>;
}

/// Plays back a recorded detection stream, one tick per call.
///
/// The recording is JSON lines: each line is an array of faces for one
/// tick (`[]` or `null` when no face was found). Once the recording runs
/// out, every further tick reports no face.
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    ticks: VecDeque<Vec<RawDetection>>,
}

impl ReplayEngine {
    /// Build an engine from in-memory ticks.
    pub fn from_ticks(ticks: impl IntoIterator<Item = Vec<RawDetection>>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    /// Parse a JSON-lines recording.
    pub fn parse(content: &str) -> Result<Self, EngineError> {
        let mut ticks = VecDeque::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                ticks.push_back(Vec::new());
                continue;
            }
            let faces: Option<Vec<RawDetection>> =
                serde_json::from_str(line).map_err(|e| EngineError::InvalidRecord {
                    line: i + 1,
                    source: e,
                })?;
            ticks.push_back(faces.unwrap_or_default());
        }
        Ok(Self { ticks })
    }

    /// Load a JSON-lines recording from disk.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let engine = Self::parse(&content)?;
        log::info!(
            "Loaded {} recorded tick(s) from {}",
            engine.remaining(),
            path.display()
        );
        Ok(engine)
    }

    /// Ticks left in the recording.
    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl FaceEngine for ReplayEngine {
    async fn detect(&mut self, _frame: &Frame) -> Result<Vec<RawDetection>, EngineError> {
        Ok(self.ticks.pop_front().unwrap_or_default())
    }
}

/// Flips another engine's detections left to right.
///
/// Pairs with a frame source that mirrors its frames, so the faces line
/// up with the selfie view the pipeline draws over.
#[derive(Debug, Clone)]
pub struct MirroredEngine<E> {
    inner: E,
    enabled: bool,
}

impl<E: FaceEngine> MirroredEngine<E> {
    pub fn new(inner: E, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: FaceEngine> FaceEngine for MirroredEngine<E> {
    async fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, EngineError> {
        let faces = self.inner.detect(frame).await?;
        if !self.enabled {
            return Ok(faces);
        }
        let width = frame.width as f32;
        Ok(faces.iter().map(|face| face.mirrored(width)).collect())
    }
}
