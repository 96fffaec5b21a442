//! Ellipses inscribed in a corner-to-corner bounding box.

use crate::geometry::{distance, midpoint};
use kurbo::{Ellipse, Point, Rect};

/// Check whether `target` is within `tolerance` of the ellipse's center.
///
/// This is a coarse test: the outline itself is not considered.
pub fn hit_test(points: &[Point], target: Point, tolerance: f64) -> bool {
    match points {
        [a, b, ..] => distance(midpoint(*a, *b), target) <= tolerance,
        _ => false,
    }
}

/// Axis-aligned ellipse inscribed in the box spanned by two opposite corners.
pub fn inscribed(a: Point, b: Point) -> Ellipse {
    Ellipse::from_rect(Rect::from_points(a, b))
}
