//! Operator overlay: detection geometry drawn onto the frame.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use nalgebra::Point2;
use retrotrack_core::{Circle, RotatedBox};
use retrotrack_tape::Side;
use serde::{Deserialize, Serialize};

const LEFT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const RIGHT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CIRCLE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTROID_RADIUS: i32 = 2;

/// One drawable element produced by a detection pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Box { side: Side, rect: RotatedBox },
    Circle { circle: Circle },
    Centroid { point: Point2<f32> },
}

/// Draw `annotations` in place. Has no effect on any measurement.
pub fn draw_overlay(image: &mut RgbImage, annotations: &[Annotation]) {
    for annotation in annotations {
        match *annotation {
            Annotation::Box { side, rect } => {
                let color = match side {
                    Side::Left => LEFT_COLOR,
                    Side::Right => RIGHT_COLOR,
                };
                draw_box(image, &rect, color);
            }
            Annotation::Circle { circle } => {
                draw_hollow_circle_mut(
                    image,
                    pixel(circle.center),
                    circle.radius.round() as i32,
                    CIRCLE_COLOR,
                );
            }
            Annotation::Centroid { point } => {
                draw_filled_circle_mut(image, pixel(point), CENTROID_RADIUS, CENTROID_COLOR);
            }
        }
    }
}

fn draw_box(image: &mut RgbImage, rect: &RotatedBox, color: Rgb<u8>) {
    for i in 0..4 {
        let a = rect.corners[i];
        let b = rect.corners[(i + 1) % 4];
        draw_line_segment_mut(image, (a.x, a.y), (b.x, b.y), color);
    }
}

fn pixel(p: Point2<f32>) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
