use retrotrack_core::{extract_shapes, Mask, RotatedBox, Shape};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, TargetResult};
use crate::measurement::TapeMeasurement;
use crate::params::TapeParams;

/// Tape detection for one frame: the published record plus the boxes that
/// produced it, copied out for drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeDetection {
    pub measurement: TapeMeasurement,
    pub left_box: Option<RotatedBox>,
    pub right_box: Option<RotatedBox>,
    /// Candidates that passed the area filter.
    pub candidates: usize,
}

impl TapeDetection {
    pub fn empty() -> Self {
        Self {
            measurement: TapeMeasurement::sentinel(),
            left_box: None,
            right_box: None,
            candidates: 0,
        }
    }
}

/// Paired-strip detector: mask -> shapes -> roles -> measurement.
pub struct TapeDetector {
    params: TapeParams,
}

impl TapeDetector {
    pub fn new(params: TapeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TapeParams {
        &self.params
    }

    /// Classify shapes already sorted largest first.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(shapes = shapes.len()))
    )]
    pub fn detect_from_shapes(&self, shapes: &[Shape]) -> TapeDetection {
        let result = classify(shapes, &self.params.roles);
        log_result(&result);
        TapeDetection {
            measurement: TapeMeasurement::from_result(&result, self.params.range.as_ref()),
            left_box: result.left().map(|s| s.rect),
            right_box: result.right().map(|s| s.rect),
            candidates: shapes.len(),
        }
    }

    /// Extract shapes from a mask and classify them.
    pub fn detect_in_mask(&self, mask: &Mask) -> TapeDetection {
        let shapes = extract_shapes(mask, self.params.min_area);
        self.detect_from_shapes(&shapes)
    }
}

fn log_result(result: &TargetResult<'_>) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for (side, shape) in [("left", result.left()), ("right", result.right())] {
        if let Some(s) = shape {
            log::debug!(
                "{side}: area={:.1} slope={:.3} ratio={:?}",
                s.area,
                s.orientation(),
                s.aspect_ratio()
            );
        }
    }
}
