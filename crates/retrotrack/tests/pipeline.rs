use approx::assert_abs_diff_eq;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use retrotrack::core::{frame_from_raw, ChannelOrder, Frame, RangeModel};
use retrotrack::{
    detect, ExposureControl, FrameStatus, MemoryStore, NoExposureControl, RangeSource, TargetKind,
    Tracker, TrackerConfig,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const OLIVE: Rgb<u8> = Rgb([128, 128, 0]);

/// Two upright white strips on black, 160x120.
///
/// Boundary areas: 9 * 49 = 441 (x 30..39) and 9 * 29 = 261 (x 100..109).
fn strip_pair_frame() -> Frame {
    let mut frame = Frame::new(160, 120);
    draw_filled_rect_mut(&mut frame, Rect::at(30, 30).of_size(10, 50), WHITE);
    draw_filled_rect_mut(&mut frame, Rect::at(100, 40).of_size(10, 30), WHITE);
    frame
}

fn single_strip_frame() -> Frame {
    let mut frame = Frame::new(160, 120);
    draw_filled_rect_mut(&mut frame, Rect::at(30, 30).of_size(10, 50), WHITE);
    frame
}

#[derive(Default)]
struct RecordingCamera {
    calls: Vec<String>,
}

impl ExposureControl for RecordingCamera {
    fn set_manual(&mut self, exposure: f64) {
        self.calls.push(format!("manual {exposure}"));
    }

    fn set_auto(&mut self) {
        self.calls.push("auto".to_string());
    }
}

#[test]
fn pair_of_strips_is_measured() {
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let frame = strip_pair_frame();
    let report = tracker.process(Some(&frame), &MemoryStore::new(), &mut NoExposureControl);

    assert!(report.frame_received);
    assert_eq!(report.status, FrameStatus::Ok);
    assert_eq!(
        report.range_source,
        Some(RangeSource::Partial {
            missing: ["HL", "SL", "VL", "HU", "SU", "VU"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
    );

    let det = report.detection.tape().expect("tape detection");
    let m = &det.measurement;
    assert!(m.valid);
    assert_eq!(det.candidates, 2);
    // equal vertical slopes: the larger strip stays left
    assert_eq!(m.left, [34.5, 54.5]);
    assert_eq!(m.right, [104.5, 54.5]);
    assert_eq!(m.center, [69.5, 54.5]);
    assert_abs_diff_eq!(m.average_area, 351.0);

    let expected = RangeModel::default().estimate(79.0).distance().unwrap();
    assert_abs_diff_eq!(m.distance().unwrap(), expected, epsilon = 1e-3);

    // box + centroid per side
    assert_eq!(report.annotations.len(), 4);
}

#[test]
fn single_strip_uses_orientation_sign() {
    let config = TrackerConfig::tape();
    let (detection, annotations) =
        detect(&single_strip_frame(), &config.default_range, &config);
    let m = detection.tape().unwrap().measurement;
    // vertical strip: slope sentinel 1 > 0, so left
    assert_eq!(m.left, [34.5, 54.5]);
    assert_eq!(m.right, [-1.0, -1.0]);
    assert_eq!(m.center, [34.5, 54.5]);
    assert_abs_diff_eq!(m.average_area, 441.0);
    assert_eq!(annotations.len(), 2);
}

#[test]
fn passes_are_idempotent() {
    let frame = strip_pair_frame();
    let store = MemoryStore::new();
    let mut a = Tracker::new(TrackerConfig::tape());
    let mut b = Tracker::new(TrackerConfig::tape());
    let first = a.process(Some(&frame), &store, &mut NoExposureControl);
    let second = a.process(Some(&frame), &store, &mut NoExposureControl);
    let other = b.process(Some(&frame), &store, &mut NoExposureControl);
    assert_eq!(first, second);
    assert_eq!(first, other);
}

#[test]
fn empty_frame_reports_sentinels() {
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let report = tracker.process(
        Some(&Frame::new(160, 120)),
        &MemoryStore::new(),
        &mut NoExposureControl,
    );
    assert_eq!(report.status, FrameStatus::Ok);
    let m = report.detection.tape().unwrap().measurement;
    assert!(!m.valid);
    assert_eq!(m.left, [-1.0, -1.0]);
    assert_eq!(m.right, [-1.0, -1.0]);
    assert_eq!(m.average_area, -1.0);
    assert!(m.range.is_none());
}

#[test]
fn auto_exposure_suppresses_reporting() {
    let frame = strip_pair_frame();
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let mut camera = RecordingCamera::default();
    let mut store = MemoryStore::with_numbers([("ExpAuto", 1.0)]);

    for _ in 0..3 {
        let report = tracker.process(Some(&frame), &store, &mut camera);
        assert_eq!(report.status, FrameStatus::ExposureSuppressed);
        assert!(report.frame_received);
        assert!(!report.detection.is_valid());
        assert!(report.annotations.is_empty());
    }

    store.set_number("ExpAuto", 0.0);
    let report = tracker.process(Some(&frame), &store, &mut camera);
    assert_eq!(report.status, FrameStatus::Ok);
    assert!(report.detection.is_valid());
    assert_eq!(camera.calls, vec!["auto", "manual 4"]);
}

#[test]
fn unreachable_store_keeps_tracking_on_defaults() {
    let frame = strip_pair_frame();
    let mut store = MemoryStore::with_numbers([("ExpAuto", 1.0)]);
    store.set_available(false);
    let mut camera = RecordingCamera::default();
    let mut tracker = Tracker::new(TrackerConfig::tape());

    let report = tracker.process(Some(&frame), &store, &mut camera);
    assert_eq!(report.range_source, Some(RangeSource::Defaults));
    assert!(report.detection.is_valid());
    assert!(camera.calls.is_empty());
}

#[test]
fn inverted_store_range_yields_nothing() {
    let store = MemoryStore::with_numbers([("HL", 100.0), ("HU", 10.0)]);
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let report = tracker.process(Some(&strip_pair_frame()), &store, &mut NoExposureControl);
    assert_eq!(report.status, FrameStatus::InvertedRange);
    assert!(!report.detection.is_valid());
}

#[test]
fn missing_frame_is_published_as_not_received() {
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let mut table = MemoryStore::new();
    let report = tracker.process(None, &table, &mut NoExposureControl);
    assert_eq!(report.status, FrameStatus::FrameMissing);
    report.publish(&mut table, &tracker.config().outputs);
    assert_eq!(table.get_bool("GettingFrameData"), Some(false));
    assert_eq!(table.get_numbers("tape1"), Some(&[-1.0, -1.0][..]));
    assert_eq!(table.get_number("avgArea"), Some(-1.0));
}

#[test]
fn published_tape_outputs_follow_roles() {
    let mut tracker = Tracker::new(TrackerConfig::tape());
    let mut table = MemoryStore::new();
    let report = tracker.process(Some(&strip_pair_frame()), &table, &mut NoExposureControl);
    report.publish(&mut table, &tracker.config().outputs);

    assert_eq!(table.get_bool("GettingFrameData"), Some(true));
    assert_eq!(table.get_numbers("tape1"), Some(&[34.5, 54.5][..]));
    assert_eq!(table.get_numbers("tape2"), Some(&[104.5, 54.5][..]));
    assert_eq!(table.get_numbers("centerN"), Some(&[69.5, 54.5][..]));
    assert_eq!(table.get_number("avgArea"), Some(351.0));
    assert!(table.get_number("distance").unwrap() > 0.0);
}

#[test]
fn bgr_buffers_segment_like_rgb() {
    let rgb = strip_pair_frame();
    let bgr: Vec<u8> = rgb
        .pixels()
        .flat_map(|p| [p.0[2], p.0[1], p.0[0]])
        .collect();
    let frame = frame_from_raw(160, 120, &bgr, ChannelOrder::Bgr).unwrap();
    let config = TrackerConfig::tape();
    assert_eq!(
        detect(&frame, &config.default_range, &config).0,
        detect(&rgb, &config.default_range, &config).0
    );
}

#[test]
fn ball_frame_reports_enclosing_circle() {
    let config = TrackerConfig::ball();
    assert_eq!(config.target, TargetKind::Ball);
    let mut frame = Frame::new(480, 270);
    draw_filled_circle_mut(&mut frame, (100, 120), 20, OLIVE);
    draw_filled_circle_mut(&mut frame, (300, 120), 3, OLIVE);

    let mut tracker = Tracker::new(config);
    let mut table = MemoryStore::new();
    let report = tracker.process(Some(&frame), &table, &mut NoExposureControl);
    let ball = report.detection.ball().expect("ball detection");
    assert_eq!(ball.balls.len(), 1);
    let [x, y, r] = ball.primary();
    assert_abs_diff_eq!(x, 100.0, epsilon = 0.6);
    assert_abs_diff_eq!(y, 120.0, epsilon = 0.6);
    assert!(r > 18.0 && r < 21.0, "radius {r}");

    report.publish(&mut table, &tracker.config().outputs);
    let flat = table.get_numbers("ball").unwrap();
    assert_eq!(flat.len(), 3);
    assert!(table.get("tape1").is_none());
}
