//! Video frame types shared by the sources, the rasterizer and the canvas.

use std::path::PathBuf;

/// Video resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 1280x720, the ideal capture size the webcam is asked for.
    pub const HD: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    /// 640x480, handy for previews and tests.
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD
    }
}

/// One decoded video frame.
///
/// Pixels are tightly packed RGB, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB order
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Position of this frame in its source stream
    pub sequence: u64,
}

impl Frame {
    /// Bytes per pixel (always 3, RGB).
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Create a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * Self::BYTES_PER_PIXEL);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
            sequence: 0,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// RGB triple at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        self.data
            .get(idx..idx + Self::BYTES_PER_PIXEL)
            .map(|p| [p[0], p[1], p[2]])
    }
}

/// Errors raised by a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The capture device or directory could not be opened
    #[error("Failed to open video source '{}': {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source contains no usable frames
    #[error("Video source '{}' contains no frames", .0.display())]
    Empty(PathBuf),
    /// A frame could not be decoded
    #[error("Failed to decode frame '{}': {source}", .path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Access to the capture device was refused
    #[error("Camera access denied")]
    MediaAccessDenied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_default_is_hd() {
        let res = Resolution::default();
        assert_eq!(res.width, 1280);
        assert_eq!(res.height, 720);
    }

    #[test]
    fn test_solid_frame_layout() {
        let frame = Frame::solid(2, 3, [10, 20, 30]);
        assert_eq!(frame.data.len(), 2 * 3 * 3);
        assert_eq!(frame.pixel(1, 2), Some([10, 20, 30]));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixel(0, 3), None);
    }

    #[test]
    fn test_pixel_reads_row_major() {
        let frame = Frame {
            data: vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
            width: 2,
            height: 2,
            sequence: 0,
        };
        assert_eq!(frame.pixel(1, 0), Some([2, 2, 2]));
        assert_eq!(frame.pixel(0, 1), Some([3, 3, 3]));
    }

    #[test]
    fn test_source_error_display() {
        assert_eq!(
            SourceError::Empty(PathBuf::from("/tmp/frames")).to_string(),
            "Video source '/tmp/frames' contains no frames"
        );
        assert_eq!(
            SourceError::MediaAccessDenied.to_string(),
            "Camera access denied"
        );
    }
}
