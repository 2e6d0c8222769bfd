//! Core stages for retro-reflective target tracking.
//!
//! Per frame: [`segment`] thresholds an RGB frame into a binary mask by HSV
//! range, [`extract_shapes`] turns the mask into area-sorted [`Shape`]s with
//! rotated boxes, and [`RangeModel`] converts an apparent width into a range.
//! Target-specific classification lives in `retrotrack-tape` and
//! `retrotrack-ball`.
//!
//! Nothing here keeps state between frames.

mod color;
mod frame;
mod geometry;
mod logger;
mod range;
mod segment;
mod shape;

pub use color::{rgb_to_hsv, ColorRange, HueScale};
pub use frame::{frame_from_raw, mask_coverage, ChannelOrder, Frame, FrameError, Mask};
pub use geometry::{min_enclosing_circle, Circle, PolygonMoments, RotatedBox, VERTICAL_SLOPE};
pub use range::{RangeEstimate, RangeModel};
pub use segment::{open, segment, threshold_hsv, SegmentParams, SegmentStatus, Segmentation};
pub use shape::{extract_shapes, Shape};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_name};

/// Point reported for a side with no detection.
pub const SENTINEL_POINT: [f32; 2] = [-1.0, -1.0];

/// Scalar reported for an invalid measurement.
pub const SENTINEL_VALUE: f64 = -1.0;
