//! Grid sampling of a video frame into colored glyph cells.

use rand::Rng;

use super::frame::{AsciiFrame, GlyphCell, MeanColor};
use crate::camera::Frame;

/// Advance width of a monospace glyph relative to its font size.
const MONOSPACE_ASPECT: f32 = 0.55;

/// Pixel size of one glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub width: u32,
    pub height: u32,
}

impl CellGeometry {
    /// Cell of a monospace font at `font_px`: the advance of `@` by the line height.
    pub fn from_font_size(font_px: u32) -> Self {
        let width = (font_px as f32 * MONOSPACE_ASPECT).floor() as u32;
        Self {
            width: width.max(1),
            height: font_px.max(1),
        }
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::from_font_size(24)
    }
}

/// Half-open codepoint range glyphs are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRange {
    pub start: u32,
    pub end: u32,
}

impl Default for GlyphRange {
    fn default() -> Self {
        Self { start: 60, end: 120 }
    }
}

impl GlyphRange {
    fn pick<R: Rng>(&self, rng: &mut R) -> char {
        let code = if self.end > self.start {
            rng.gen_range(self.start..self.end)
        } else {
            self.start
        };
        char::from_u32(code).unwrap_or('?')
    }
}

/// Number of cell columns and rows needed to cover a frame.
pub fn grid_dimensions(frame_width: u32, frame_height: u32, cell: CellGeometry) -> (u32, u32) {
    if cell.width == 0 || cell.height == 0 {
        return (0, 0);
    }
    (
        frame_width.div_ceil(cell.width),
        frame_height.div_ceil(cell.height),
    )
}

/// Mean RGB over the pixels of a region, clipped to the frame.
///
/// Returns black for a region that lies entirely outside the frame.
pub fn average_rgb(frame: &Frame, x: u32, y: u32, width: u32, height: u32) -> MeanColor {
    let end_x = x.saturating_add(width).min(frame.width);
    let end_y = y.saturating_add(height).min(frame.height);
    let bpp = Frame::BYTES_PER_PIXEL;

    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for py in y..end_y {
        let row_start = (py as usize * frame.width as usize + x as usize) * bpp;
        let row_end = (py as usize * frame.width as usize + end_x as usize) * bpp;
        let Some(row) = frame.data.get(row_start..row_end) else {
            continue;
        };
        for px in row.chunks_exact(bpp) {
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
            count += 1;
        }
    }

    if count == 0 {
        return MeanColor::default();
    }

    let n = count as f64;
    MeanColor {
        r: (sum[0] as f64 / n) as f32,
        g: (sum[1] as f64 / n) as f32,
        b: (sum[2] as f64 / n) as f32,
    }
}

/// Turns frames into glyph grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiRasterizer {
    cell: CellGeometry,
    glyphs: GlyphRange,
}

impl AsciiRasterizer {
    pub fn new(cell: CellGeometry, glyphs: GlyphRange) -> Self {
        Self { cell, glyphs }
    }

    pub fn cell(&self) -> CellGeometry {
        self.cell
    }

    /// Sample `frame` into a row-major grid of cells.
    ///
    /// Every cell is colored with the mean of its pixels and gets a random
    /// glyph; nothing carries over between frames.
    pub fn rasterize<R: Rng>(&self, frame: &Frame, rng: &mut R) -> AsciiFrame {
        let (columns, rows) = grid_dimensions(frame.width, frame.height, self.cell);
        let mut cells = Vec::with_capacity((columns * rows) as usize);

        for row in 0..rows {
            let y = row * self.cell.height;
            let height = self.cell.height.min(frame.height - y);
            for column in 0..columns {
                let x = column * self.cell.width;
                let width = self.cell.width.min(frame.width - x);
                cells.push(GlyphCell {
                    x,
                    y,
                    width,
                    height,
                    glyph: self.glyphs.pick(rng),
                    color: average_rgb(frame, x, y, width, height),
                });
            }
        }

        AsciiFrame {
            columns,
            rows,
            cells,
        }
    }
}
