//! High-level facade for the `retrotrack-*` workspace.
//!
//! This crate provides:
//! - re-exports of the stage crates
//! - [`TrackerConfig`], loaded from JSON with per-deployment presets
//! - the live parameter store and publication traits
//! - [`Tracker`], which runs one frame at a time and owns the exposure state
//! - overlay drawing for the operator stream
//!
//! ## Quickstart
//!
//! ```
//! use retrotrack::{MemoryStore, NoExposureControl, Tracker, TrackerConfig};
//! use retrotrack::core::Frame;
//!
//! let mut tracker = Tracker::new(TrackerConfig::tape());
//! let mut table = MemoryStore::new();
//! let frame = Frame::new(160, 120);
//!
//! let report = tracker.process(Some(&frame), &table, &mut NoExposureControl);
//! report.publish(&mut table, &tracker.config().outputs);
//! assert_eq!(table.get_bool("GettingFrameData"), Some(true));
//! assert_eq!(table.get_number("avgArea"), Some(-1.0));
//! ```
//!
//! ## API map
//! - `retrotrack::core`: segmentation, shapes, geometry, range model.
//! - `retrotrack::tape`: left/right tape classification.
//! - `retrotrack::ball`: circular targets.
//! - [`analyze`] / [`detect`]: the pure per-frame stages.

pub use retrotrack_ball as ball;
pub use retrotrack_core as core;
pub use retrotrack_tape as tape;

mod config;
mod exposure;
mod overlay;
mod pipeline;
mod store;

pub use config::{
    ColorRangeKeys, ConfigError, ExposureParams, OutputKeys, TargetKind, TrackerConfig,
};
pub use exposure::{ExposureControl, ExposureMachine, ExposureMode, NoExposureControl};
pub use overlay::{draw_overlay, Annotation};
pub use pipeline::{analyze, detect, Analysis, Detection, FrameReport, FrameStatus, Tracker};
pub use store::{
    resolve_color_range, MeasurementSink, MemoryStore, ParameterStore, RangeSource,
    ResolvedColorRange, StoreError, StoreValue,
};
