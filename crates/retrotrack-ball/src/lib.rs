//! Circular target (ball) selection.
//!
//! The largest shapes of a frame are inspected in area order; each one's
//! minimum enclosing circle and moment centroid are computed and the circle
//! is reported if its radius clears a threshold. [`CircleMultiplicity`]
//! selects whether one or all qualifying circles are reported.

mod detector;
mod params;

pub use detector::{select_balls, BallCandidate, BallDetector, BallMeasurement};
pub use params::{BallParams, CircleMultiplicity};
