use nalgebra::Point2;
use retrotrack_core::{extract_shapes, Circle, Mask, Shape, SENTINEL_VALUE};
use serde::{Deserialize, Serialize};

use crate::params::{BallParams, CircleMultiplicity};

/// One qualifying circular target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallCandidate {
    /// Minimum enclosing circle of the boundary.
    pub circle: Circle,
    /// Area-weighted centroid; the circle center for a zero-area polygon.
    pub centroid: Point2<f32>,
    pub area: f64,
}

impl BallCandidate {
    /// `[x, y, radius]` of the enclosing circle.
    pub fn triple(&self) -> [f64; 3] {
        [
            self.circle.center.x as f64,
            self.circle.center.y as f64,
            self.circle.radius as f64,
        ]
    }
}

/// Externally reported ball record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BallMeasurement {
    /// Largest first; empty when nothing qualified.
    pub balls: Vec<BallCandidate>,
}

impl BallMeasurement {
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        !self.balls.is_empty()
    }

    /// `[x, y, radius]` of the largest ball, all `-1` when none.
    pub fn primary(&self) -> [f64; 3] {
        self.balls
            .first()
            .map(BallCandidate::triple)
            .unwrap_or([SENTINEL_VALUE; 3])
    }

    /// `[x0, y0, r0, x1, y1, r1, ...]`, or `[-1, -1, -1]` when empty.
    pub fn flattened(&self) -> Vec<f64> {
        if self.balls.is_empty() {
            return vec![SENTINEL_VALUE; 3];
        }
        self.balls.iter().flat_map(BallCandidate::triple).collect()
    }
}

/// Pick circular targets from shapes sorted largest first.
///
/// Inspects at most `max_candidates` shapes in area order. Each contributes
/// only if its enclosing radius exceeds `min_radius`.
pub fn select_balls(shapes: &[Shape], params: &BallParams) -> Vec<BallCandidate> {
    let mut out = Vec::new();
    for shape in shapes.iter().take(params.max_candidates) {
        let Some(circle) = shape.enclosing_circle() else {
            continue;
        };
        if circle.radius <= params.min_radius {
            log::debug!(
                "circle at ({:.1}, {:.1}) r={:.2} below radius threshold",
                circle.center.x,
                circle.center.y,
                circle.radius
            );
            continue;
        }
        let centroid = shape.moment_centroid().unwrap_or(circle.center);
        out.push(BallCandidate {
            circle,
            centroid,
            area: shape.area,
        });
        if params.multiplicity == CircleMultiplicity::Largest {
            break;
        }
    }
    out
}

/// Circular-target detector.
pub struct BallDetector {
    params: BallParams,
}

impl BallDetector {
    pub fn new(params: BallParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BallParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(shapes = shapes.len()))
    )]
    pub fn detect_from_shapes(&self, shapes: &[Shape]) -> BallMeasurement {
        BallMeasurement {
            balls: select_balls(shapes, &self.params),
        }
    }

    pub fn detect_in_mask(&self, mask: &Mask) -> BallMeasurement {
        let shapes = extract_shapes(mask, self.params.min_area);
        self.detect_from_shapes(&shapes)
    }
}
