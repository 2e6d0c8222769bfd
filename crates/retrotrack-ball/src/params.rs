use serde::{Deserialize, Serialize};

/// How many qualifying circles one frame may report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleMultiplicity {
    /// Only the largest-area qualifying circle.
    #[default]
    Largest,
    /// Every qualifying circle among the inspected candidates, largest first.
    All,
}

/// Ball tracking parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallParams {
    /// Shapes below this boundary area are not candidates.
    pub min_area: f64,
    /// Number of largest shapes inspected per frame.
    pub max_candidates: usize,
    /// A circle qualifies only with `radius > min_radius`.
    pub min_radius: f32,
    pub multiplicity: CircleMultiplicity,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            min_area: 0.0,
            max_candidates: 5,
            min_radius: 5.0,
            multiplicity: CircleMultiplicity::Largest,
        }
    }
}
