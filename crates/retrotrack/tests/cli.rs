use std::fs;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_strip_frame(path: &std::path::Path) {
    let mut img = RgbImage::new(160, 120);
    let white = Rgb([255, 255, 255]);
    draw_filled_rect_mut(&mut img, Rect::at(30, 30).of_size(10, 50), white);
    draw_filled_rect_mut(&mut img, Rect::at(100, 40).of_size(10, 30), white);
    img.save(path).expect("save frame");
}

fn retrotrack() -> Command {
    Command::cargo_bin("retrotrack").expect("binary built")
}

#[test]
fn prints_ball_preset() {
    retrotrack()
        .args(["--target", "ball", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"target\": \"ball\""))
        .stdout(predicate::str::contains("\"fallback_width\": 480"));
}

#[test]
fn writes_report_and_treats_unreadable_image_as_missing_frame() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("frame0.png");
    write_strip_frame(&frame);
    let missing = dir.path().join("missing.png");
    let report = dir.path().join("report.json");
    let overlays = dir.path().join("overlay");

    retrotrack()
        .arg("--report")
        .arg(&report)
        .arg("--overlay-dir")
        .arg(&overlays)
        .arg(&frame)
        .arg(&missing)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let frames = json.as_array().unwrap();
    assert_eq!(frames.len(), 2);

    assert_eq!(frames[0]["frame_received"], true);
    assert_eq!(frames[0]["status"], "ok");
    assert_eq!(frames[0]["detection"]["kind"], "tape");
    assert_eq!(frames[0]["detection"]["measurement"]["valid"], true);
    assert_eq!(frames[0]["detection"]["measurement"]["average_area"], 351.0);

    assert_eq!(frames[1]["frame_received"], false);
    assert_eq!(frames[1]["status"], "frame_missing");
    assert_eq!(frames[1]["detection"]["measurement"]["left"][0], -1.0);

    assert!(overlays.join("frame0_overlay.png").exists());
    assert!(!overlays.join("missing_overlay.png").exists());
}

#[test]
fn auto_exposure_flag_suppresses_detection() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("frame.png");
    write_strip_frame(&frame);

    let output = retrotrack()
        .arg("--auto-exposure")
        .arg(&frame)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["status"], "exposure_suppressed");
    assert_eq!(json[0]["exposure"], "auto");
    assert_eq!(json[0]["detection"]["measurement"]["valid"], false);
}

#[test]
fn store_overrides_reach_the_color_range() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("frame.png");
    write_strip_frame(&frame);

    // only unsaturated, bright pixels pass
    let output = retrotrack()
        .args(["--set", "HL=0", "--set", "HU=10", "--set", "SL=0"])
        .args(["--set", "SU=0", "--set", "VL=250", "--set", "VU=255"])
        .arg(&frame)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["range_source"]["kind"], "store");
    assert_eq!(json[0]["detection"]["measurement"]["valid"], true);
}

#[test]
fn json_logging_flag_is_accepted() {
    retrotrack()
        .args(["--log-json", "--log-level", "debug", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"target\": \"tape\""));
}

#[test]
fn rejects_malformed_set() {
    retrotrack()
        .args(["--set", "HL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn missing_config_file_fails() {
    retrotrack()
        .args(["--config", "/nonexistent/retrotrack.json", "x.png"])
        .assert()
        .failure();
}
