//! Video input boundary.
//!
//! The pipeline pulls frames through the [`FrameSource`] trait:
//! - [`ImageSequence`] plays back a directory of stills
//! - [`BlankSource`] produces black frames for overlay-only sessions

mod frame_utils;
mod source;
mod types;

pub use frame_utils::{from_rgb_image, mirror_horizontal};
pub use source::{BlankSource, FrameSource, ImageSequence};
pub use types::{Frame, Resolution, SourceError};
