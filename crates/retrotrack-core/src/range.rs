//! Monocular range estimate from apparent target width (pinhole model).

use serde::{Deserialize, Serialize};

/// Camera and target constants for the pinhole range estimate.
///
/// Assumes the target is seen frontally; no off-axis correction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeModel {
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
    /// Image width in pixels the field of view spans.
    pub image_width_px: f64,
    /// Half of the physical target width, in output units.
    pub half_width: f64,
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            image_width_px: 640.0,
            half_width: 5.125,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RangeEstimate {
    Distance(f64),
    /// Zero (or otherwise unusable) angular size.
    Indeterminate,
}

impl RangeEstimate {
    pub fn distance(self) -> Option<f64> {
        match self {
            RangeEstimate::Distance(d) => Some(d),
            RangeEstimate::Indeterminate => None,
        }
    }
}

impl RangeModel {
    pub fn degrees_per_pixel(&self) -> f64 {
        self.fov_deg / self.image_width_px
    }

    /// Angular size in degrees of an apparent width in pixels.
    pub fn angular_size_deg(&self, apparent_width_px: f64) -> f64 {
        apparent_width_px * self.degrees_per_pixel()
    }

    /// `half_width / tan(angular size)`.
    pub fn estimate(&self, apparent_width_px: f64) -> RangeEstimate {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.image_width_px) || !positive(apparent_width_px) {
            return RangeEstimate::Indeterminate;
        }
        let angle = self.angular_size_deg(apparent_width_px).to_radians();
        let tan = angle.tan();
        if !positive(angle) || !positive(tan) {
            return RangeEstimate::Indeterminate;
        }
        let d = self.half_width / tan;
        if d.is_finite() {
            RangeEstimate::Distance(d)
        } else {
            RangeEstimate::Indeterminate
        }
    }
}
