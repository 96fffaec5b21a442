//! Rectangle outlines.

use crate::geometry::{in_range, scalar_near};
use kurbo::{Point, Rect};

/// Check whether `target` is on the border of the rectangle spanned by two
/// opposite corners. The interior is not a hit.
pub fn hit_test(points: &[Point], target: Point, tolerance: f64) -> bool {
    let [a, b] = match points {
        [a, b, ..] => [*a, *b],
        _ => return false,
    };

    let on_horizontal_edge = (scalar_near(a.y, target.y, tolerance)
        || scalar_near(b.y, target.y, tolerance))
        && in_range(a.x, b.x, target.x);
    if on_horizontal_edge {
        return true;
    }

    (scalar_near(a.x, target.x, tolerance) || scalar_near(b.x, target.x, tolerance))
        && in_range(a.y, b.y, target.y)
}

/// Normalized rectangle for two opposite corners.
pub fn bounds(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}
