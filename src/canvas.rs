//! Drawing surface the renderers paint on.
//!
//! The canvas matches the video's native resolution. It has a pixel layer
//! (RGBA, transparent where nothing is drawn) and a text layer holding the
//! last ASCII frame, since glyphs are only turned into characters by the
//! terminal. On the pixel layer each glyph is drawn from the built-in
//! bitmap font at its cell's top-left corner, in the cell's mean color.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect;
use std::path::Path;

use crate::ascii::{font, AsciiFrame, GlyphCell};
use crate::detection::Point;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Errors writing the canvas out.
#[derive(Debug, thiserror::Error)]
#[error("Failed to save canvas to '{}': {source}", .path.display())]
pub struct CanvasError {
    path: std::path::PathBuf,
    #[source]
    source: image::ImageError,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    text: AsciiFrame,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            text: AsciiFrame::default(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Match the canvas to a new video size, clearing it if the size changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions() != (width, height) {
            *self = Self::new(width, height);
        }
    }

    /// Wipe both layers.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
        self.text = AsciiFrame::default();
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The ASCII frame last painted, if any.
    pub fn text(&self) -> &AsciiFrame {
        &self.text
    }

    /// Draw every glyph of an ASCII frame and keep it as the text layer.
    pub fn paint_ascii(&mut self, ascii: &AsciiFrame) {
        // the first cell is never clipped unless the frame is smaller than a cell
        let scale = ascii
            .cells
            .first()
            .map_or(1, |c| font::scale_for(c.width, c.height));
        for cell in &ascii.cells {
            self.draw_glyph(cell, scale);
        }
        self.text = ascii.clone();
    }

    fn draw_glyph(&mut self, cell: &GlyphCell, scale: u32) {
        let color = opaque(cell.color.to_rgb());
        let right = cell.x + cell.width;
        let bottom = cell.y + cell.height;
        for (col, row) in font::dots(cell.glyph) {
            let x = cell.x + col * scale;
            let y = cell.y + row * scale;
            if x >= right || y >= bottom {
                continue;
            }
            let rect = Rect::at(x as i32, y as i32)
                .of_size(scale.min(right - x), scale.min(bottom - y));
            draw_filled_rect_mut(&mut self.pixels, rect, color);
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: [u8; 3]) {
        let radius = radius.abs().round() as i32;
        let center = (center.x.round() as i32, center.y.round() as i32);
        draw_filled_circle_mut(&mut self.pixels, center, radius, opaque(color));
    }

    /// Fill a closed polygon given by its outline (not repeating the first point).
    pub fn fill_polygon(&mut self, outline: &[Point], color: [u8; 3]) {
        let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(outline.len());
        for p in outline {
            let px = PixelPoint::new(p.x.round() as i32, p.y.round() as i32);
            if poly.last() != Some(&px) {
                poly.push(px);
            }
        }
        while poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() < 3 {
            return;
        }
        draw_polygon_mut(&mut self.pixels, &poly, opaque(color));
    }

    /// Scale `icon` to `width`x`height` and alpha-blend it with its top-left at `(x, y)`.
    ///
    /// Parts falling outside the canvas are clipped.
    pub fn composite_icon(&mut self, icon: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
        let w = width.round();
        let h = height.round();
        if w < 1.0 || h < 1.0 {
            return;
        }
        let scaled = imageops::resize(icon, w as u32, h as u32, FilterType::Triangle);
        imageops::overlay(&mut self.pixels, &scaled, x.round() as i64, y.round() as i64);
    }

    /// Write the pixel layer as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), CanvasError> {
        self.pixels.save(path).map_err(|e| CanvasError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{GlyphCell, MeanColor};

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.dimensions(), (4, 3));
        assert!(canvas.pixels().pixels().all(|p| *p == TRANSPARENT));
        assert!(canvas.text().is_empty());
    }

    #[test]
    fn test_fill_circle_paints_center() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_circle(Point::new(10.0, 10.0), 3.0, [1, 2, 3]);
        assert_eq!(*canvas.pixels().get_pixel(10, 10), Rgba([1, 2, 3, 255]));
        assert_eq!(*canvas.pixels().get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_fill_polygon_paints_inside() {
        let mut canvas = Canvas::new(20, 20);
        let square = [
            Point::new(2.0, 2.0),
            Point::new(12.0, 2.0),
            Point::new(12.0, 12.0),
            Point::new(2.0, 12.0),
            Point::new(2.0, 2.0),
        ];
        canvas.fill_polygon(&square, [9, 9, 9]);
        assert_eq!(*canvas.pixels().get_pixel(7, 7), Rgba([9, 9, 9, 255]));
        assert_eq!(*canvas.pixels().get_pixel(15, 15), TRANSPARENT);
    }

    #[test]
    fn test_degenerate_polygon_is_skipped() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_polygon(&[Point::new(1.0, 1.0), Point::new(1.2, 1.1)], [9, 9, 9]);
        assert!(canvas.pixels().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_paint_ascii_draws_glyph_and_text_layer() {
        let ascii = AsciiFrame {
            columns: 1,
            rows: 1,
            cells: vec![GlyphCell {
                x: 1,
                y: 1,
                width: 12,
                height: 16,
                glyph: 'x',
                color: MeanColor {
                    r: 10.0,
                    g: 20.0,
                    b: 30.0,
                },
            }],
        };
        let mut canvas = Canvas::new(16, 20);
        canvas.paint_ascii(&ascii);
        let ink = Rgba([10, 20, 30, 255]);
        // 'x' at scale 2: dot (0, 2) and the crossing dot (2, 4) are lit
        assert_eq!(*canvas.pixels().get_pixel(1, 5), ink);
        assert_eq!(*canvas.pixels().get_pixel(5, 9), ink);
        // dot (0, 0) is background inside the cell
        assert_eq!(*canvas.pixels().get_pixel(1, 1), TRANSPARENT);
        assert_eq!(*canvas.pixels().get_pixel(0, 0), TRANSPARENT);
        let inked = canvas.pixels().pixels().filter(|p| **p == ink).count();
        assert_eq!(inked as u32, font::dots('x').count() as u32 * 4);
        assert_eq!(canvas.text().to_plain_string(), "x");

        canvas.clear();
        assert!(canvas.text().is_empty());
        assert_eq!(*canvas.pixels().get_pixel(1, 5), TRANSPARENT);
    }

    #[test]
    fn test_glyph_is_clipped_to_its_cell() {
        let cell = |x: u32, glyph: char| GlyphCell {
            x,
            y: 0,
            width: if x == 0 { 12 } else { 1 },
            height: 16,
            glyph,
            color: MeanColor {
                r: 255.0,
                g: 255.0,
                b: 255.0,
            },
        };
        let ascii = AsciiFrame {
            columns: 2,
            rows: 1,
            cells: vec![cell(0, ' '), cell(12, '|')],
        };
        let mut canvas = Canvas::new(20, 16);
        canvas.paint_ascii(&ascii);
        // '|' lives in column 2, past the 1px edge cell
        assert!(canvas.pixels().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_composite_icon_is_scaled_and_clipped() {
        let icon = RgbaImage::from_pixel(2, 1, Rgba([200, 0, 0, 255]));
        let mut canvas = Canvas::new(10, 10);
        canvas.composite_icon(&icon, -2.0, 8.0, 8.0, 4.0);
        assert_eq!(*canvas.pixels().get_pixel(0, 9), Rgba([200, 0, 0, 255]));
        assert_eq!(*canvas.pixels().get_pixel(5, 9), Rgba([200, 0, 0, 255]));
        assert_eq!(*canvas.pixels().get_pixel(7, 9), TRANSPARENT);
        assert_eq!(*canvas.pixels().get_pixel(0, 7), TRANSPARENT);
    }

    #[test]
    fn test_resize_only_clears_on_change() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_circle(Point::new(2.0, 2.0), 1.0, [1, 1, 1]);
        canvas.resize(5, 5);
        assert_ne!(*canvas.pixels().get_pixel(2, 2), TRANSPARENT);
        canvas.resize(6, 4);
        assert_eq!(canvas.dimensions(), (6, 4));
        assert!(canvas.pixels().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_save_png_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        Canvas::new(7, 3).save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (7, 3));
    }
}
