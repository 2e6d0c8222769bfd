use serde::{Deserialize, Serialize};

/// A 3-channel 8-bit camera frame (RGB order).
pub type Frame = ::image::RgbImage;

/// Single-channel binary mask: 0 or 255 per pixel.
pub type Mask = ::image::GrayImage;

/// Byte order of an interleaved 3-channel buffer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Errors produced when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Build a [`Frame`] from an interleaved 3-channel buffer.
///
/// BGR buffers are reordered to RGB so downstream stages see one layout.
pub fn frame_from_raw(
    width: u32,
    height: u32,
    pixels: &[u8],
    order: ChannelOrder,
) -> Result<Frame, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimensions { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(FrameError::InvalidDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(FrameError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }

    let data = match order {
        ChannelOrder::Rgb => pixels.to_vec(),
        ChannelOrder::Bgr => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect(),
    };
    Frame::from_raw(width, height, data).ok_or(FrameError::InvalidDimensions { width, height })
}

/// Number of set (non-zero) pixels in a mask.
pub fn mask_coverage(mask: &Mask) -> usize {
    mask.as_raw().iter().filter(|&&v| v != 0).count()
}
