//! Shape geometry: rotated bounding boxes, polygon moments and enclosing circles.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

const EDGE_EPS: f32 = 1e-6;

/// Slope reported for an edge with no horizontal span.
pub const VERTICAL_SLOPE: f32 = 1.0;

/// Minimum-area rotated rectangle, as 4 corners in cyclic order.
///
/// Edge `c0 -> c1` runs along the caliper direction of the best hull edge,
/// edge `c1 -> c2` along its normal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedBox {
    pub corners: [Point2<f32>; 4],
}

impl RotatedBox {
    pub fn new(corners: [Point2<f32>; 4]) -> Self {
        Self { corners }
    }

    /// Rotating-calipers search over the edges of a convex hull.
    ///
    /// Hulls with fewer than two distinct points collapse to a single point.
    pub fn enclosing_hull(hull: &[Point2<f32>]) -> Self {
        let Some(&first) = hull.first() else {
            return Self::new([Point2::origin(); 4]);
        };

        let mut best: Option<(f32, [Point2<f32>; 4])> = None;
        let n = hull.len();
        for i in 0..n {
            let edge = hull[(i + 1) % n] - hull[i];
            let len = edge.norm();
            if len <= EDGE_EPS {
                continue;
            }
            let u = edge / len;
            let v = Vector2::new(-u.y, u.x);

            let (mut u_min, mut u_max) = (f32::INFINITY, f32::NEG_INFINITY);
            let (mut v_min, mut v_max) = (f32::INFINITY, f32::NEG_INFINITY);
            for p in hull {
                let pv = p.coords;
                let a = pv.dot(&u);
                let b = pv.dot(&v);
                u_min = u_min.min(a);
                u_max = u_max.max(a);
                v_min = v_min.min(b);
                v_max = v_max.max(b);
            }

            let area = (u_max - u_min) * (v_max - v_min);
            if best.map(|(a, _)| area < a).unwrap_or(true) {
                let at = |a: f32, b: f32| Point2::from(u * a + v * b);
                best = Some((
                    area,
                    [
                        at(u_min, v_min),
                        at(u_max, v_min),
                        at(u_max, v_max),
                        at(u_min, v_max),
                    ],
                ));
            }
        }

        match best {
            Some((_, corners)) => Self::new(corners),
            None => Self::new([first; 4]),
        }
    }

    /// Componentwise mean of the 4 corners.
    pub fn centroid(&self) -> Point2<f32> {
        let sum = self
            .corners
            .iter()
            .fold(Vector2::zeros(), |acc, c| acc + c.coords);
        Point2::from(sum / 4.0)
    }

    /// Lengths of edges `c0 -> c1` and `c1 -> c2`.
    pub fn edge_lengths(&self) -> (f32, f32) {
        let [c0, c1, c2, _] = self.corners;
        ((c1 - c0).norm(), (c2 - c1).norm())
    }

    /// Signed rise/run of the longer of the two adjacent edges.
    ///
    /// Used only to order tape strips; it is not a geometric angle. A vertical
    /// longer edge yields [`VERTICAL_SLOPE`]. On equal lengths edge `c1 -> c2`
    /// is used.
    pub fn orientation(&self) -> f32 {
        let [c0, c1, c2, _] = self.corners;
        let (a, b) = self.edge_lengths();
        let (p, q) = if a > b { (c0, c1) } else { (c1, c2) };
        let run = p.x - q.x;
        if run.abs() <= EDGE_EPS {
            return VERTICAL_SLOPE;
        }
        (p.y - q.y) / run
    }

    /// Long side over short side, always `>= 1`.
    ///
    /// `None` when either side has zero length.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let (a, b) = self.edge_lengths();
        if a <= EDGE_EPS || b <= EDGE_EPS {
            return None;
        }
        let ratio = a / b;
        Some(if ratio < 1.0 { 1.0 / ratio } else { ratio })
    }

    /// `(min_x, max_x)` over the corners.
    pub fn x_extent(&self) -> (f32, f32) {
        self.corners
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.x), hi.max(c.x))
            })
    }
}

/// Area moments of a closed polygon (Green's theorem).
///
/// `m00` is signed by winding direction; ratios are winding independent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolygonMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl PolygonMoments {
    pub fn from_points(points: &[Point2<f32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }
        let mut m = Self::default();
        for i in 0..n {
            let (x0, y0) = (points[i].x as f64, points[i].y as f64);
            let j = (i + 1) % n;
            let (x1, y1) = (points[j].x as f64, points[j].y as f64);
            let cross = x0 * y1 - x1 * y0;
            m.m00 += cross;
            m.m10 += (x0 + x1) * cross;
            m.m01 += (y0 + y1) * cross;
        }
        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m
    }

    /// Unsigned enclosed area.
    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// Area-weighted centroid, `None` for a zero-area polygon.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        if self.m00.abs() < 1e-12 {
            return None;
        }
        Some(Point2::new(
            (self.m10 / self.m00) as f32,
            (self.m01 / self.m00) as f32,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

#[derive(Clone, Copy)]
struct CircleF64 {
    cx: f64,
    cy: f64,
    r: f64,
}

impl CircleF64 {
    fn contains(&self, p: (f64, f64)) -> bool {
        let d = ((p.0 - self.cx).powi(2) + (p.1 - self.cy).powi(2)).sqrt();
        d <= self.r * (1.0 + 1e-9) + 1e-7
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let cx = 0.5 * (a.0 + b.0);
        let cy = 0.5 * (a.1 + b.1);
        let r = 0.5 * ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        Self { cx, cy, r }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < 1e-12 {
            // collinear: the widest pair spans all three
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .fold(Self::from_two(a, b), |best, c| if c.r > best.r { c } else { best });
        }
        let sa = a.0 * a.0 + a.1 * a.1;
        let sb = b.0 * b.0 + b.1 * b.1;
        let sc = c.0 * c.0 + c.1 * c.1;
        let cx = (sa * (b.1 - c.1) + sb * (c.1 - a.1) + sc * (a.1 - b.1)) / d;
        let cy = (sa * (c.0 - b.0) + sb * (a.0 - c.0) + sc * (b.0 - a.0)) / d;
        let r = ((a.0 - cx).powi(2) + (a.1 - cy).powi(2)).sqrt();
        Self { cx, cy, r }
    }
}

/// Smallest circle containing every point (incremental Welzl, no shuffling).
///
/// Deterministic for a given point order. `None` for an empty input.
pub fn min_enclosing_circle(points: &[Point2<f32>]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let &p0 = pts.first()?;

    let mut c = CircleF64 {
        cx: p0.0,
        cy: p0.1,
        r: 0.0,
    };
    for i in 1..pts.len() {
        if c.contains(pts[i]) {
            continue;
        }
        c = CircleF64 {
            cx: pts[i].0,
            cy: pts[i].1,
            r: 0.0,
        };
        for j in 0..i {
            if c.contains(pts[j]) {
                continue;
            }
            c = CircleF64::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !c.contains(pts[k]) {
                    c = CircleF64::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Some(Circle {
        center: Point2::new(c.cx as f32, c.cy as f32),
        radius: c.r as f32,
    })
}
