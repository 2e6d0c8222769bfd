//! Paired retro-reflective tape strips: left/right role assignment and the
//! per-frame tape measurement.
//!
//! ## Quickstart
//!
//! ```
//! use retrotrack_core::Mask;
//! use retrotrack_tape::{TapeDetector, TapeParams};
//!
//! let detector = TapeDetector::new(TapeParams::default());
//! let detection = detector.detect_in_mask(&Mask::new(160, 120));
//! assert!(!detection.measurement.valid);
//! assert_eq!(detection.measurement.left, [-1.0, -1.0]);
//! ```
//!
//! Roles:
//! 1. No candidate: everything is reported as the sentinel.
//! 2. One candidate: [`SingleRolePolicy`] picks its side; the other side is
//!    the sentinel.
//! 3. Two or more: only the two largest are used and [`PairRolePolicy`]
//!    orders them.

mod classify;
mod detector;
mod measurement;
mod params;

pub use classify::{classify, order_pair, single_side, Side, TargetResult};
pub use detector::{TapeDetection, TapeDetector};
pub use measurement::{apparent_width, TapeMeasurement};
pub use params::{PairRolePolicy, RoleAssignmentPolicy, SingleRolePolicy, TapeParams};
