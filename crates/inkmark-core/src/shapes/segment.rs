//! Straight segments, with or without an arrowhead.

use crate::geometry::{in_range, point_near, scalar_near};
use kurbo::{Point, Vec2};

/// Minimum arrowhead length in pixels.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

/// Check whether `target` is within `tolerance` of the line through the first
/// two points.
///
/// The line equation `y = kx + b` is solved for x at the target's y and for
/// y at the target's x; either reconstructed point landing inside the
/// tolerance box counts as a hit. Axis-parallel lines have no usable slope
/// and are tested against the segment's span instead.
pub fn hit_test(points: &[Point], target: Point, tolerance: f64) -> bool {
    let [p1, p2] = match points {
        [p1, p2, ..] => [*p1, *p2],
        _ => return false,
    };

    let vertical = (p1.x - p2.x).abs() < f64::EPSILON;
    let horizontal = (p1.y - p2.y).abs() < f64::EPSILON;

    if vertical && horizontal {
        return point_near(p1, target, tolerance);
    }
    if vertical {
        return scalar_near(target.x, p1.x, tolerance) && in_range(p1.y, p2.y, target.y);
    }
    if horizontal {
        return scalar_near(target.y, p1.y, tolerance) && in_range(p1.x, p2.x, target.x);
    }

    let k = (p1.y - p2.y) / (p1.x - p2.x);
    let b = p1.y - k * p1.x;

    let on_line_at_y = Point::new((target.y - b) / k, target.y);
    let on_line_at_x = Point::new(target.x, k * target.x + b);

    point_near(on_line_at_y, target, tolerance) || point_near(on_line_at_x, target, tolerance)
}

/// Compute the two barb tips of an arrowhead pointing at `end`.
///
/// Returns `None` for a zero-length segment, which has no direction.
pub fn arrow_head(start: Point, end: Point, line_width: f64) -> Option<(Point, Point)> {
    let shaft = end - start;
    let len = shaft.hypot();
    if len < f64::EPSILON {
        return None;
    }

    let dir = shaft / len;
    let perp = Vec2::new(-dir.y, dir.x);
    let size = ARROW_HEAD_LENGTH.max(line_width * 3.0);

    let back = end - dir * size;
    Some((back + perp * (size * 0.5), back - perp * (size * 0.5)))
}
