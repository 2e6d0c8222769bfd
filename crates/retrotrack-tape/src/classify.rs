//! Left/right role assignment over an area-sorted shape list.

use retrotrack_core::Shape;
use serde::{Deserialize, Serialize};

use crate::params::{PairRolePolicy, RoleAssignmentPolicy, SingleRolePolicy};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Classification of one frame's candidate strips.
///
/// Borrows from the shape list of the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetResult<'a> {
    Empty,
    Single { shape: &'a Shape, side: Side },
    Pair { left: &'a Shape, right: &'a Shape },
}

impl<'a> TargetResult<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, TargetResult::Empty)
    }

    pub fn left(&self) -> Option<&'a Shape> {
        match *self {
            TargetResult::Single {
                shape,
                side: Side::Left,
            } => Some(shape),
            TargetResult::Pair { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&'a Shape> {
        match *self {
            TargetResult::Single {
                shape,
                side: Side::Right,
            } => Some(shape),
            TargetResult::Pair { right, .. } => Some(right),
            _ => None,
        }
    }
}

/// Assign roles to `shapes`, which must be sorted largest first.
///
/// Only the first two entries are considered; any further shapes are ignored.
pub fn classify<'a>(shapes: &'a [Shape], policy: &RoleAssignmentPolicy) -> TargetResult<'a> {
    match shapes {
        [] => TargetResult::Empty,
        [shape] => TargetResult::Single {
            shape,
            side: single_side(shape, policy.single),
        },
        [first, second, ..] => {
            if let Some(min) = policy.pair_min_area {
                if first.area <= min || second.area <= min {
                    log::debug!(
                        "pair rejected: areas {:.1}, {:.1}, threshold {min}",
                        first.area,
                        second.area
                    );
                    return TargetResult::Empty;
                }
            }
            let (left, right) = order_pair(first, second, policy.pair);
            TargetResult::Pair { left, right }
        }
    }
}

/// Side of a lone strip under `policy`.
pub fn single_side(shape: &Shape, policy: SingleRolePolicy) -> Side {
    match policy {
        SingleRolePolicy::ScreenPosition { midline_x } => {
            if shape.centroid().x < midline_x {
                Side::Right
            } else {
                Side::Left
            }
        }
        SingleRolePolicy::OrientationSign => {
            if shape.orientation() <= 0.0 {
                Side::Right
            } else {
                Side::Left
            }
        }
    }
}

/// `(left, right)` for two strips; `first` wins ties.
pub fn order_pair<'a>(
    first: &'a Shape,
    second: &'a Shape,
    policy: PairRolePolicy,
) -> (&'a Shape, &'a Shape) {
    let swap = match policy {
        PairRolePolicy::SlopeOrder => second.orientation() > first.orientation(),
        PairRolePolicy::HorizontalOrder => second.centroid().x < first.centroid().x,
    };
    if swap {
        (second, first)
    } else {
        (first, second)
    }
}
