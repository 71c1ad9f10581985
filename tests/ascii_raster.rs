//! Integration tests for the ASCII rasterizer and the canvas text layer.

use rand::rngs::StdRng;
use rand::SeedableRng;

use mood_mirror::ascii::{AsciiRasterizer, CellGeometry, GlyphRange};
use mood_mirror::camera::{mirror_horizontal, Frame};
use mood_mirror::canvas::Canvas;

/// Frame whose pixel at (x, y) is (x, y, x + y) truncated to bytes.
fn coordinate_frame(width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, (x + y) as u8]);
        }
    }
    Frame {
        data,
        width,
        height,
        sequence: 0,
    }
}

fn mean(values: impl Iterator<Item = u32>) -> f32 {
    let v: Vec<u32> = values.collect();
    v.iter().sum::<u32>() as f32 / v.len() as f32
}

#[test]
fn test_cell_count_is_ceiling_of_frame_over_cell() {
    let cases = [(100, 50, 13, 24), (13, 24, 13, 24), (14, 25, 13, 24), (1, 1, 4, 4)];
    for (w, h, cw, ch) in cases {
        let rasterizer = AsciiRasterizer::new(
            CellGeometry {
                width: cw,
                height: ch,
            },
            GlyphRange::default(),
        );
        let ascii = rasterizer.rasterize(&coordinate_frame(w, h), &mut StdRng::seed_from_u64(0));
        let expected = w.div_ceil(cw) * h.div_ceil(ch);
        assert_eq!(ascii.cells.len() as u32, expected, "{}x{} / {}x{}", w, h, cw, ch);
    }
}

#[test]
fn test_every_cell_has_exact_mean_of_its_pixels() {
    let (w, h) = (30, 17);
    let frame = coordinate_frame(w, h);
    let rasterizer = AsciiRasterizer::new(
        CellGeometry {
            width: 7,
            height: 5,
        },
        GlyphRange::default(),
    );
    let ascii = rasterizer.rasterize(&frame, &mut StdRng::seed_from_u64(0));

    for cell in &ascii.cells {
        let xs = cell.x..cell.x + cell.width;
        let ys = cell.y..cell.y + cell.height;
        let coords: Vec<(u32, u32)> = ys
            .clone()
            .flat_map(|y| xs.clone().map(move |x| (x, y)))
            .collect();
        assert!(cell.x + cell.width <= w && cell.y + cell.height <= h);
        assert!((cell.color.r - mean(coords.iter().map(|c| c.0))).abs() < 1e-4);
        assert!((cell.color.g - mean(coords.iter().map(|c| c.1))).abs() < 1e-4);
        assert!((cell.color.b - mean(coords.iter().map(|c| c.0 + c.1))).abs() < 1e-4);
    }
}

#[test]
fn test_default_glyphs_are_printable() {
    let ascii = AsciiRasterizer::default()
        .rasterize(&coordinate_frame(200, 120), &mut StdRng::seed_from_u64(99));
    assert!(ascii
        .cells
        .iter()
        .all(|c| c.glyph.is_ascii_graphic()));
}

#[test]
fn test_mirrored_frame_mirrors_cell_colors() {
    let frame = coordinate_frame(8, 2);
    let mut mirrored = frame.clone();
    mirror_horizontal(&mut mirrored);

    let rasterizer = AsciiRasterizer::new(
        CellGeometry {
            width: 4,
            height: 2,
        },
        GlyphRange::default(),
    );
    let a = rasterizer.rasterize(&frame, &mut StdRng::seed_from_u64(1));
    let b = rasterizer.rasterize(&mirrored, &mut StdRng::seed_from_u64(1));
    assert_eq!(a.cells[0].color, b.cells[1].color);
    assert_eq!(a.cells[1].color, b.cells[0].color);
}

#[test]
fn test_canvas_keeps_text_layer_for_terminal() {
    let ascii = AsciiRasterizer::new(
        CellGeometry {
            width: 2,
            height: 2,
        },
        GlyphRange { start: 65, end: 66 },
    )
    .rasterize(&coordinate_frame(4, 4), &mut StdRng::seed_from_u64(0));

    let mut canvas = Canvas::new(4, 4);
    canvas.paint_ascii(&ascii);
    assert_eq!(canvas.text().to_plain_string(), "AA\nAA");
    // top-left cell covers (0..2, 0..2): mean (0.5, 0.5, 1.0) rounds to (1, 1, 1).
    // Within the 2x2 clip only dot (1, 1) of 'A' is lit.
    assert_eq!(canvas.pixels().get_pixel(1, 1).0, [1, 1, 1, 255]);
    assert_eq!(canvas.pixels().get_pixel(0, 0).0[3], 0);
}

#[test]
fn test_canvas_pixels_carry_glyph_shapes() {
    let frame = Frame::solid(26, 24, [200, 100, 50]);
    let rasterizer = AsciiRasterizer::new(CellGeometry::default(), GlyphRange { start: 72, end: 73 });
    let ascii = rasterizer.rasterize(&frame, &mut StdRng::seed_from_u64(4));
    assert_eq!(ascii.to_plain_string(), "HH");

    let mut canvas = Canvas::new(26, 24);
    canvas.paint_ascii(&ascii);
    let ink = [200, 100, 50, 255];
    let inked = |x0: u32| {
        (x0..x0 + 13)
            .flat_map(|x| (0..24).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.pixels().get_pixel(x, y).0 == ink)
            .count()
    };
    // 'H' has 17 dots, each 2x2 at the default cell size
    assert_eq!(inked(0), 17 * 4);
    assert_eq!(inked(13), 17 * 4);
    // the gap between the stems is background
    assert_eq!(canvas.pixels().get_pixel(4, 2).0[3], 0);
}
