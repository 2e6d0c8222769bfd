//! Candidate shape extraction from a binary mask.

use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use nalgebra::Point2;

use crate::frame::Mask;
use crate::geometry::{min_enclosing_circle, Circle, PolygonMoments, RotatedBox};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One external connected component of a mask with its derived geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Discovery order among the contours of the source mask.
    pub index: usize,
    /// Boundary polygon area (not the box area).
    pub area: f64,
    pub rect: RotatedBox,
    /// Boundary pixels in tracing order.
    pub contour: Vec<Point2<f32>>,
}

impl Shape {
    /// Build a shape from a traced boundary.
    ///
    /// Returns `None` for a zero-area boundary: such a component has no
    /// meaningful box.
    pub fn from_contour(index: usize, points: &[Point<i32>]) -> Option<Self> {
        let contour: Vec<Point2<f32>> = points
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();
        let area = PolygonMoments::from_points(&contour).area();
        if area <= 0.0 {
            return None;
        }

        let hull: Vec<Point2<f32>> = convex_hull(points)
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();
        let rect = RotatedBox::enclosing_hull(&hull);

        Some(Self {
            index,
            area,
            rect,
            contour,
        })
    }

    /// Mean of the 4 box corners.
    pub fn centroid(&self) -> Point2<f32> {
        self.rect.centroid()
    }

    /// Slope of the longer box edge, see [`RotatedBox::orientation`].
    pub fn orientation(&self) -> f32 {
        self.rect.orientation()
    }

    pub fn aspect_ratio(&self) -> Option<f32> {
        self.rect.aspect_ratio()
    }

    /// Area-weighted centroid of the boundary polygon.
    pub fn moment_centroid(&self) -> Option<Point2<f32>> {
        PolygonMoments::from_points(&self.contour).centroid()
    }

    pub fn enclosing_circle(&self) -> Option<Circle> {
        min_enclosing_circle(&self.contour)
    }
}

/// Extract external shapes with `area >= min_area`, largest first.
///
/// Holes are ignored. Ties keep discovery order. Zero-area components are
/// dropped even when `min_area` is 0.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width(), height = mask.height()))
)]
pub fn extract_shapes(mask: &Mask, min_area: f64) -> Vec<Shape> {
    let contours = find_contours::<i32>(mask);
    let total = contours.len();

    let mut shapes: Vec<Shape> = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .enumerate()
        .filter_map(|(index, c)| Shape::from_contour(index, &c.points))
        .filter(|s| s.area >= min_area)
        .collect();

    // stable: equal areas keep discovery order
    shapes.sort_by(|a, b| b.area.total_cmp(&a.area));

    log::debug!(
        "contours: {total}, shapes kept: {} (min_area={min_area})",
        shapes.len()
    );
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn mask_with_rects(w: u32, h: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for &(x0, y0, rw, rh) in rects {
            for y in y0..y0 + rh {
                for x in x0..x0 + rw {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    #[test]
    fn shapes_are_sorted_by_area_descending() {
        // boundary areas: (11-1)*(51-1)=500 and (21-1)*(61-1)=1200
        let mask = mask_with_rects(120, 100, &[(5, 5, 11, 51), (50, 10, 21, 61)]);
        let shapes = extract_shapes(&mask, 1.0);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].area, 1200.0);
        assert_eq!(shapes[1].area, 500.0);
    }

    #[test]
    fn small_shapes_are_filtered() {
        let mask = mask_with_rects(100, 60, &[(5, 5, 6, 6), (30, 5, 21, 21)]);
        let shapes = extract_shapes(&mask, 30.0);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].area, 400.0);
    }

    #[test]
    fn zero_area_components_are_dropped_with_zero_min_area() {
        // isolated pixel and a one-pixel-wide line have no enclosed area
        let mask = mask_with_rects(60, 40, &[(5, 5, 1, 1), (10, 20, 15, 1), (30, 5, 5, 5)]);
        let shapes = extract_shapes(&mask, 0.0);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].area, 16.0);
    }

    #[test]
    fn holes_do_not_produce_shapes() {
        let mut mask = mask_with_rects(60, 60, &[(10, 10, 31, 31)]);
        for y in 20..30 {
            for x in 20..30 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let shapes = extract_shapes(&mask, 1.0);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].area, 900.0);
    }

    #[test]
    fn box_centroid_of_axis_aligned_rect() {
        let mask = mask_with_rects(80, 80, &[(10, 20, 11, 31)]);
        let shapes = extract_shapes(&mask, 1.0);
        let c = shapes[0].centroid();
        assert!((c.x - 15.0).abs() < 1e-4);
        assert!((c.y - 35.0).abs() < 1e-4);
        // tall strip: long edge is vertical
        assert_eq!(shapes[0].orientation(), 1.0);
    }

    #[test]
    fn empty_mask_has_no_shapes() {
        let mask = GrayImage::new(32, 32);
        assert!(extract_shapes(&mask, 0.0).is_empty());
    }
}
