use retrotrack_core::{RangeEstimate, RangeModel, SENTINEL_POINT, SENTINEL_VALUE};
use serde::{Deserialize, Serialize};

use crate::classify::TargetResult;

/// Externally reported tape record; owns no shape data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeMeasurement {
    pub left: [f32; 2],
    pub right: [f32; 2],
    pub center: [f32; 2],
    /// Mean boundary area of the reported strips, `-1` when invalid.
    pub average_area: f64,
    pub valid: bool,
    /// Present only when a range model is configured and a strip was seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeEstimate>,
}

impl TapeMeasurement {
    /// Nothing detected.
    pub const fn sentinel() -> Self {
        Self {
            left: SENTINEL_POINT,
            right: SENTINEL_POINT,
            center: SENTINEL_POINT,
            average_area: SENTINEL_VALUE,
            valid: false,
            range: None,
        }
    }

    /// Summarize a classification.
    ///
    /// A lone strip reports its centroid as both its side and the center,
    /// and its own area as the average.
    pub fn from_result(result: &TargetResult<'_>, range: Option<&RangeModel>) -> Self {
        let point = |p: nalgebra::Point2<f32>| [p.x, p.y];
        let mut m = match *result {
            TargetResult::Empty => return Self::sentinel(),
            TargetResult::Single { shape, .. } => {
                let c = point(shape.centroid());
                Self {
                    left: result.left().map(|_| c).unwrap_or(SENTINEL_POINT),
                    right: result.right().map(|_| c).unwrap_or(SENTINEL_POINT),
                    center: c,
                    average_area: shape.area,
                    valid: true,
                    range: None,
                }
            }
            TargetResult::Pair { left, right } => {
                let l = left.centroid();
                let r = right.centroid();
                Self {
                    left: point(l),
                    right: point(r),
                    center: [0.5 * (l.x + r.x), 0.5 * (l.y + r.y)],
                    average_area: 0.5 * (left.area + right.area),
                    valid: true,
                    range: None,
                }
            }
        };
        if let (Some(model), Some(width)) = (range, apparent_width(result)) {
            m.range = Some(model.estimate(width));
        }
        m
    }

    pub fn distance(&self) -> Option<f64> {
        self.range.and_then(RangeEstimate::distance)
    }
}

impl Default for TapeMeasurement {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Horizontal pixel span covered by the reported strip boxes.
pub fn apparent_width(result: &TargetResult<'_>) -> Option<f64> {
    let shapes: Vec<_> = [result.left(), result.right()].into_iter().flatten().collect();
    if shapes.is_empty() {
        return None;
    }
    let (lo, hi) = shapes
        .iter()
        .map(|s| s.rect.x_extent())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    Some((hi - lo) as f64)
}
