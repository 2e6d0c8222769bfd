//! Per-frame tracking pipeline.
//!
//! `Frame + ColorRange -> segment -> shapes -> classify -> measurement`, with
//! the exposure machine deciding whether the frame is analysed at all.

use retrotrack_ball::{BallDetector, BallMeasurement};
use retrotrack_core::{
    extract_shapes, segment, ColorRange, Frame, SegmentStatus, SENTINEL_VALUE,
};
use retrotrack_tape::{Side, TapeDetection, TapeDetector};
use serde::Serialize;

use crate::config::{OutputKeys, TargetKind, TrackerConfig};
use crate::exposure::{ExposureControl, ExposureMachine, ExposureMode};
use crate::overlay::Annotation;
use crate::store::{resolve_color_range, MeasurementSink, ParameterStore, RangeSource};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Measurement of one frame for the configured target kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detection {
    Tape(TapeDetection),
    Ball(BallMeasurement),
}

impl Detection {
    /// All-sentinel measurement for `target`.
    pub fn sentinel(target: TargetKind) -> Self {
        match target {
            TargetKind::Tape => Detection::Tape(TapeDetection::empty()),
            TargetKind::Ball => Detection::Ball(BallMeasurement::sentinel()),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Detection::Tape(t) => t.measurement.valid,
            Detection::Ball(b) => b.valid(),
        }
    }

    pub fn tape(&self) -> Option<&TapeDetection> {
        match self {
            Detection::Tape(t) => Some(t),
            Detection::Ball(_) => None,
        }
    }

    pub fn ball(&self) -> Option<&BallMeasurement> {
        match self {
            Detection::Ball(b) => Some(b),
            Detection::Tape(_) => None,
        }
    }
}

/// Outcome of one frame, beyond the measurement itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    Ok,
    FrameMissing,
    InvertedRange,
    /// Auto exposure is active; the frame was not analysed.
    ExposureSuppressed,
}

impl From<SegmentStatus> for FrameStatus {
    fn from(status: SegmentStatus) -> Self {
        match status {
            SegmentStatus::Ok => FrameStatus::Ok,
            SegmentStatus::FrameMissing => FrameStatus::FrameMissing,
            SegmentStatus::InvertedRange => FrameStatus::InvertedRange,
        }
    }
}

/// Result of running the detection stages on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub status: SegmentStatus,
    pub detection: Detection,
    pub annotations: Vec<Annotation>,
}

/// Run the stages on an optional frame. Pure: no store, no exposure state.
pub fn analyze(frame: Option<&Frame>, range: &ColorRange, config: &TrackerConfig) -> Analysis {
    let seg = segment(frame, range, &config.segment);
    if seg.status != SegmentStatus::Ok {
        return Analysis {
            status: seg.status,
            detection: Detection::sentinel(config.target),
            annotations: Vec::new(),
        };
    }

    let mut annotations = Vec::new();
    let detection = match config.target {
        TargetKind::Tape => {
            let det = TapeDetector::new(config.tape.clone()).detect_in_mask(&seg.mask);
            for (side, rect) in [(Side::Left, det.left_box), (Side::Right, det.right_box)] {
                if let Some(rect) = rect {
                    annotations.push(Annotation::Box { side, rect });
                    annotations.push(Annotation::Centroid {
                        point: rect.centroid(),
                    });
                }
            }
            Detection::Tape(det)
        }
        TargetKind::Ball => {
            let shapes = extract_shapes(&seg.mask, config.ball.min_area);
            let m = BallDetector::new(config.ball.clone()).detect_from_shapes(&shapes);
            for ball in &m.balls {
                annotations.push(Annotation::Circle {
                    circle: ball.circle,
                });
                annotations.push(Annotation::Centroid {
                    point: ball.centroid,
                });
            }
            Detection::Ball(m)
        }
    };

    Analysis {
        status: seg.status,
        detection,
        annotations,
    }
}

/// Detection and overlay annotations for a present frame.
pub fn detect(
    frame: &Frame,
    range: &ColorRange,
    config: &TrackerConfig,
) -> (Detection, Vec<Annotation>) {
    let analysis = analyze(Some(frame), range, config);
    (analysis.detection, analysis.annotations)
}

/// Everything produced for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_received: bool,
    pub exposure: ExposureMode,
    /// Absent when the frame was suppressed before the store was read.
    pub range_source: Option<RangeSource>,
    pub status: FrameStatus,
    pub detection: Detection,
    pub annotations: Vec<Annotation>,
}

impl FrameReport {
    /// Write the frame's outputs under `keys`.
    ///
    /// The frame-received flag is written every frame, followed by the
    /// target outputs (sentinels when nothing was detected).
    pub fn publish<K: MeasurementSink + ?Sized>(&self, sink: &mut K, keys: &OutputKeys) {
        sink.put_bool(&keys.frame_received, self.frame_received);
        match &self.detection {
            Detection::Tape(det) => {
                let m = &det.measurement;
                let point = |p: [f32; 2]| [p[0] as f64, p[1] as f64];
                sink.put_number_array(&keys.left, &point(m.left));
                sink.put_number_array(&keys.right, &point(m.right));
                sink.put_number_array(&keys.center, &point(m.center));
                sink.put_number(&keys.average_area, m.average_area);
                sink.put_number(&keys.distance, m.distance().unwrap_or(SENTINEL_VALUE));
            }
            Detection::Ball(m) => {
                sink.put_number_array(&keys.ball, &m.flattened());
            }
        }
    }
}

/// Frame loop state: configuration plus the exposure machine.
pub struct Tracker {
    config: TrackerConfig,
    exposure: ExposureMachine,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        let exposure = ExposureMachine::new(config.exposure.manual_exposure);
        Self { config, exposure }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn exposure_mode(&self) -> ExposureMode {
        self.exposure.mode()
    }

    /// Process one frame.
    ///
    /// Reads the exposure request and color range from `store`, commands
    /// `camera` on exposure transitions, and never fails: store outages fall
    /// back to defaults and a missing frame yields an all-sentinel report.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(frame = frame.is_some()))
    )]
    pub fn process<S, C>(
        &mut self,
        frame: Option<&Frame>,
        store: &S,
        camera: &mut C,
    ) -> FrameReport
    where
        S: ParameterStore + ?Sized,
        C: ExposureControl + ?Sized,
    {
        let frame_received = frame.is_some();
        let requested = match store.number(&self.config.exposure.request_key) {
            Ok(value) => ExposureMode::from_request(value),
            Err(err) => {
                log::debug!("{err}; keeping manual exposure");
                ExposureMode::Manual
            }
        };
        self.exposure.update(requested, camera);

        if self.exposure.mode() == ExposureMode::Auto {
            return FrameReport {
                frame_received,
                exposure: ExposureMode::Auto,
                range_source: None,
                status: FrameStatus::ExposureSuppressed,
                detection: Detection::sentinel(self.config.target),
                annotations: Vec::new(),
            };
        }

        let resolved =
            resolve_color_range(store, &self.config.range_keys, &self.config.default_range);
        let analysis = analyze(frame, &resolved.range, &self.config);
        if analysis.status == SegmentStatus::FrameMissing {
            log::warn!("no frame received");
        }

        FrameReport {
            frame_received,
            exposure: ExposureMode::Manual,
            range_source: Some(resolved.source),
            status: analysis.status.into(),
            detection: analysis.detection,
            annotations: analysis.annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::NoExposureControl;
    use crate::store::MemoryStore;

    #[test]
    fn missing_frame_reports_sentinel() {
        let mut tracker = Tracker::new(TrackerConfig::tape());
        let report = tracker.process(None, &MemoryStore::new(), &mut NoExposureControl);
        assert!(!report.frame_received);
        assert_eq!(report.status, FrameStatus::FrameMissing);
        assert_eq!(report.detection, Detection::sentinel(TargetKind::Tape));
        assert!(report.annotations.is_empty());
    }

    #[test]
    fn sentinel_publish_writes_every_key() {
        let report = FrameReport {
            frame_received: false,
            exposure: ExposureMode::Manual,
            range_source: None,
            status: FrameStatus::FrameMissing,
            detection: Detection::sentinel(TargetKind::Tape),
            annotations: Vec::new(),
        };
        let keys = OutputKeys::default();
        let mut sink = MemoryStore::new();
        report.publish(&mut sink, &keys);
        assert_eq!(sink.get_bool("GettingFrameData"), Some(false));
        assert_eq!(sink.get_numbers("tape1"), Some(&[-1.0, -1.0][..]));
        assert_eq!(sink.get_numbers("tape2"), Some(&[-1.0, -1.0][..]));
        assert_eq!(sink.get_numbers("centerN"), Some(&[-1.0, -1.0][..]));
        assert_eq!(sink.get_number("avgArea"), Some(-1.0));
        assert_eq!(sink.get_number("distance"), Some(-1.0));
        assert!(sink.get("ball").is_none());
    }

    #[test]
    fn ball_sentinel_publishes_flat_triple() {
        let report = FrameReport {
            frame_received: true,
            exposure: ExposureMode::Auto,
            range_source: None,
            status: FrameStatus::ExposureSuppressed,
            detection: Detection::sentinel(TargetKind::Ball),
            annotations: Vec::new(),
        };
        let mut sink = MemoryStore::new();
        report.publish(&mut sink, &OutputKeys::default());
        assert_eq!(sink.get_numbers("ball"), Some(&[-1.0, -1.0, -1.0][..]));
        assert!(sink.get("tape1").is_none());
    }
}
