use retrotrack_core::RangeModel;
use serde::{Deserialize, Serialize};

/// How a lone strip is assigned a side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SingleRolePolicy {
    /// Centroid x below `midline_x` is the *right* strip, otherwise *left*.
    ScreenPosition { midline_x: f32 },
    /// Orientation `<= 0` is the *right* strip, otherwise *left*.
    OrientationSign,
}

impl Default for SingleRolePolicy {
    fn default() -> Self {
        SingleRolePolicy::OrientationSign
    }
}

/// How the two largest strips are ordered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairRolePolicy {
    /// Greater orientation is the left strip.
    #[default]
    SlopeOrder,
    /// Smaller centroid x is the left strip.
    HorizontalOrder,
}

/// Role assignment for zero, one or many candidate strips.
///
/// On ties in either pair policy the first-listed (larger) strip is left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAssignmentPolicy {
    pub single: SingleRolePolicy,
    pub pair: PairRolePolicy,
    /// If either of the two largest strips has area at or below this, report
    /// nothing.
    pub pair_min_area: Option<f64>,
}

/// Tape tracking parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapeParams {
    /// Shapes below this boundary area are not candidates.
    pub min_area: f64,
    pub roles: RoleAssignmentPolicy,
    /// Range estimate from the apparent width, when configured.
    pub range: Option<RangeModel>,
}

impl Default for TapeParams {
    fn default() -> Self {
        Self {
            min_area: 30.0,
            roles: RoleAssignmentPolicy::default(),
            range: Some(RangeModel::default()),
        }
    }
}
