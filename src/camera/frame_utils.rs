//! Frame conversion and transformation utilities.

use image::RgbImage;

use super::types::Frame;

/// Convert a decoded image into a `Frame`.
pub fn from_rgb_image(image: RgbImage, sequence: u64) -> Frame {
    let (width, height) = image.dimensions();
    Frame {
        data: image.into_raw(),
        width,
        height,
        sequence,
    }
}

/// Flip a frame left-right in place, as a selfie camera shows it.
pub fn mirror_horizontal(frame: &mut Frame) {
    let bpp = Frame::BYTES_PER_PIXEL;
    let stride = frame.width as usize * bpp;
    if stride == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(stride) {
        // reversing the row also reverses each pixel's channels; undo that
        row.reverse();
        for px in row.chunks_exact_mut(bpp) {
            px.reverse();
        }
    }
}
