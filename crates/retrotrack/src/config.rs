//! Tracker configuration loaded from JSON.

use std::fs;
use std::path::Path;

use retrotrack_ball::BallParams;
use retrotrack_core::{ColorRange, RangeModel, SegmentParams};
use retrotrack_tape::{RoleAssignmentPolicy, SingleRolePolicy, TapeParams};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which target the tracker looks for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Tape,
    Ball,
}

/// Store keys for the six HSV bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRangeKeys {
    pub hue_lower: String,
    pub hue_upper: String,
    pub sat_lower: String,
    pub sat_upper: String,
    pub val_lower: String,
    pub val_upper: String,
}

impl Default for ColorRangeKeys {
    fn default() -> Self {
        Self {
            hue_lower: "HL".into(),
            hue_upper: "HU".into(),
            sat_lower: "SL".into(),
            sat_upper: "SU".into(),
            val_lower: "VL".into(),
            val_upper: "VU".into(),
        }
    }
}

/// Store keys the per-frame results are published under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputKeys {
    pub frame_received: String,
    pub left: String,
    pub right: String,
    pub center: String,
    pub average_area: String,
    pub distance: String,
    pub ball: String,
}

impl Default for OutputKeys {
    fn default() -> Self {
        Self {
            frame_received: "GettingFrameData".into(),
            left: "tape1".into(),
            right: "tape2".into(),
            center: "centerN".into(),
            average_area: "avgArea".into(),
            distance: "distance".into(),
            ball: "ball".into(),
        }
    }
}

/// Exposure switching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureParams {
    /// Store key holding the request: non-zero means auto exposure.
    pub request_key: String,
    /// Manual exposure value restored when leaving auto mode.
    pub manual_exposure: f64,
}

impl Default for ExposureParams {
    fn default() -> Self {
        Self {
            request_key: "ExpAuto".into(),
            manual_exposure: 4.0,
        }
    }
}

/// Full tracker configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub target: TargetKind,
    pub segment: SegmentParams,
    /// Used for every bound missing from the store.
    pub default_range: ColorRange,
    pub range_keys: ColorRangeKeys,
    pub tape: TapeParams,
    pub ball: BallParams,
    pub exposure: ExposureParams,
    pub outputs: OutputKeys,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::tape()
    }
}

impl TrackerConfig {
    /// Tape deployment on a 160x120 stream.
    pub fn tape() -> Self {
        Self {
            target: TargetKind::Tape,
            segment: SegmentParams::default(),
            default_range: ColorRange::new([0, 0, 94], [57, 167, 255]),
            range_keys: ColorRangeKeys::default(),
            tape: TapeParams {
                min_area: 30.0,
                roles: RoleAssignmentPolicy {
                    single: SingleRolePolicy::OrientationSign,
                    ..RoleAssignmentPolicy::default()
                },
                range: Some(RangeModel::default()),
            },
            ball: BallParams::default(),
            exposure: ExposureParams::default(),
            outputs: OutputKeys::default(),
        }
    }

    /// Ball deployment on a 480x270 stream.
    pub fn ball() -> Self {
        Self {
            target: TargetKind::Ball,
            segment: SegmentParams {
                fallback_width: 480,
                fallback_height: 270,
                ..SegmentParams::default()
            },
            default_range: ColorRange::new([26, 71, 53], [35, 255, 154]),
            ..Self::tape()
        }
    }

    pub fn for_target(target: TargetKind) -> Self {
        match target {
            TargetKind::Tape => Self::tape(),
            TargetKind::Ball => Self::ball(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = TrackerConfig::from_json_str(
            r#"{ "tape": { "min_area": 75.0 }, "segment": { "morphology": false } }"#,
        )
        .unwrap();
        assert_eq!(cfg.tape.min_area, 75.0);
        assert!(!cfg.segment.morphology);
        assert_eq!(cfg.segment.morphology_iterations, 2);
        assert_eq!(cfg.outputs.left, "tape1");
        assert_eq!(cfg.exposure.request_key, "ExpAuto");
    }

    #[test]
    fn presets_round_trip_through_json() {
        for cfg in [TrackerConfig::tape(), TrackerConfig::ball()] {
            let json = cfg.to_json_pretty().unwrap();
            assert_eq!(TrackerConfig::from_json_str(&json).unwrap(), cfg);
        }
    }

    #[test]
    fn ball_preset_uses_ball_range() {
        let cfg = TrackerConfig::for_target(TargetKind::Ball);
        assert_eq!(cfg.target, TargetKind::Ball);
        assert_eq!(cfg.default_range.lower, [26, 71, 53]);
        assert_eq!(cfg.segment.fallback_width, 480);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TrackerConfig::from_json_file("/nonexistent/retrotrack.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
