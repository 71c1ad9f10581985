//! ASCII frame types produced by the rasterizer.

/// Mean color of a glyph cell.
///
/// Channels hold the exact arithmetic mean of the sampled pixels, so they
/// are fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MeanColor {
    /// Round to the nearest 8-bit RGB triple.
    pub fn to_rgb(self) -> [u8; 3] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        ]
    }
}

/// One rendered character and the frame region it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCell {
    /// Left edge of the cell in frame pixels
    pub x: u32,
    /// Top edge of the cell in frame pixels
    pub y: u32,
    /// Width actually covered (edge cells may be clipped)
    pub width: u32,
    /// Height actually covered (edge cells may be clipped)
    pub height: u32,
    pub glyph: char,
    pub color: MeanColor,
}

/// Grid of glyph cells covering a whole frame, row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsciiFrame {
    /// Cells per row
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
    pub cells: Vec<GlyphCell>,
}

impl AsciiFrame {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at grid position `(column, row)`.
    pub fn cell(&self, column: u32, row: u32) -> Option<&GlyphCell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.columns + column) as usize)
    }

    /// Characters only, rows joined by newlines.
    pub fn to_plain_string(&self) -> String {
        if self.columns == 0 {
            return String::new();
        }
        self.cells
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|c| c.glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Characters with 24-bit ANSI foreground colors, one line per row.
    pub fn to_ansi_string(&self) -> String {
        if self.columns == 0 {
            return String::new();
        }

        // ~20 bytes of escape per cell
        let mut out = String::with_capacity(self.cells.len() * 20);
        for row in self.cells.chunks(self.columns as usize) {
            for cell in row {
                let [r, g, b] = cell.color.to_rgb();
                out.push_str(&format!("\x1b[38;2;{};{};{}m{}", r, g, b, cell.glyph));
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}
