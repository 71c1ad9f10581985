//! ASCII rendition of the video.
//!
//! The frame is cut into fixed-size cells (one per character of a
//! monospace font). Each cell becomes one randomly chosen glyph painted
//! in the cell's mean color, so the picture survives while the
//! characters flicker from frame to frame.

pub mod font;
mod frame;
mod rasterizer;

pub use frame::{AsciiFrame, GlyphCell, MeanColor};
pub use rasterizer::{average_rgb, grid_dimensions, AsciiRasterizer, CellGeometry, GlyphRange};
