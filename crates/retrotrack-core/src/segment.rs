//! Color segmentation: frame + HSV range -> binary mask.

use image::Luma;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use serde::{Deserialize, Serialize};

use crate::color::{rgb_to_hsv, ColorRange, HueScale};
use crate::frame::{Frame, Mask};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Segmenter configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    pub hue_scale: HueScale,
    /// Erode then dilate the mask to remove speckle noise.
    pub morphology: bool,
    /// Passes of a 3x3 square element for each of erode and dilate.
    pub morphology_iterations: u8,
    /// Mask size reported when no frame was received.
    pub fallback_width: u32,
    pub fallback_height: u32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            hue_scale: HueScale::Half,
            morphology: true,
            morphology_iterations: 2,
            fallback_width: 160,
            fallback_height: 120,
        }
    }
}

/// Side-channel outcome of one segmentation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    Ok,
    /// No frame was supplied; the mask is all zero at the fallback size.
    FrameMissing,
    /// `lower > upper` on some channel; the mask is all zero.
    InvertedRange,
}

#[derive(Clone, Debug)]
pub struct Segmentation {
    pub mask: Mask,
    pub status: SegmentStatus,
}

/// Threshold a frame into a `{0, 255}` mask by HSV range membership.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, params), fields(present = frame.is_some()))
)]
pub fn segment(frame: Option<&Frame>, range: &ColorRange, params: &SegmentParams) -> Segmentation {
    let Some(frame) = frame else {
        return Segmentation {
            mask: Mask::new(params.fallback_width, params.fallback_height),
            status: SegmentStatus::FrameMissing,
        };
    };

    if !range.is_ordered() {
        log::warn!(
            "inverted color range lower={:?} upper={:?}, mask left empty",
            range.lower,
            range.upper
        );
        return Segmentation {
            mask: Mask::new(frame.width(), frame.height()),
            status: SegmentStatus::InvertedRange,
        };
    }

    let mut mask = threshold_hsv(frame, range, params.hue_scale);
    if params.morphology && params.morphology_iterations > 0 {
        mask = open(&mask, params.morphology_iterations);
    }

    Segmentation {
        mask,
        status: SegmentStatus::Ok,
    }
}

/// Per-pixel HSV inclusion test.
pub fn threshold_hsv(frame: &Frame, range: &ColorRange, scale: HueScale) -> Mask {
    let mut mask = Mask::new(frame.width(), frame.height());
    for (x, y, px) in frame.enumerate_pixels() {
        if range.contains(rgb_to_hsv(px.0, scale)) {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Erosion followed by dilation with an L-infinity ball of radius `k`.
///
/// Equivalent to `k` passes of a 3x3 square element each way.
pub fn open(mask: &Mask, k: u8) -> Mask {
    dilate(&erode(mask, Norm::LInf, k), Norm::LInf, k)
}
