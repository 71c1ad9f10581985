//! Frame sources: where the pipeline pulls video from.
//!
//! Live capture is owned by the host; the crate only needs "give me the
//! current frame". Sources are read without backpressure: every call
//! returns whatever frame is current now.

use std::path::{Path, PathBuf};

use super::frame_utils::{from_rgb_image, mirror_horizontal};
use super::types::{Frame, Resolution, SourceError};

/// A continuous video frame source.
pub trait FrameSource {
    /// Return the current frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).next_frame()
    }
}

/// Plays back a directory of still images as a video stream.
///
/// Files are ordered by name. Anything the `image` crate cannot identify
/// by extension is skipped.
#[derive(Debug)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    cursor: usize,
    /// Keeps counting across loops
    sequence: u64,
    mirror: bool,
    looping: bool,
}

impl ImageSequence {
    pub fn open(dir: &Path, mirror: bool) -> Result<Self, SourceError> {
        let entries = std::fs::read_dir(dir).map_err(|e| SourceError::OpenFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && image::ImageFormat::from_path(p).is_ok())
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(SourceError::Empty(dir.to_path_buf()));
        }

        log::info!("Loaded {} frame(s) from {}", paths.len(), dir.display());
        Ok(Self {
            paths,
            cursor: 0,
            sequence: 0,
            mirror,
            looping: false,
        })
    }

    /// Restart from the first image instead of ending the stream.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.cursor >= self.paths.len() {
            if !self.looping {
                return Ok(None);
            }
            self.cursor = 0;
        }

        let path = &self.paths[self.cursor];
        let decoded = image::open(path).map_err(|e| SourceError::DecodeFailed {
            path: path.clone(),
            source: e,
        })?;
        let mut frame = from_rgb_image(decoded.to_rgb8(), self.sequence);
        if self.mirror {
            mirror_horizontal(&mut frame);
        }

        self.cursor += 1;
        self.sequence += 1;
        Ok(Some(frame))
    }
}

/// Endless black frames, for overlay-only sessions without recorded video.
#[derive(Debug, Clone)]
pub struct BlankSource {
    resolution: Resolution,
    sequence: u64,
}

impl BlankSource {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            sequence: 0,
        }
    }
}

impl FrameSource for BlankSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let mut frame = Frame::solid(self.resolution.width, self.resolution.height, [0, 0, 0]);
        frame.sequence = self.sequence;
        self.sequence += 1;
        Ok(Some(frame))
    }
}
