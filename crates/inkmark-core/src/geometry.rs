//! Tolerance predicates shared by pointer sampling and hit-testing.
//!
//! All predicates are total: they never panic and never produce NaN-driven
//! surprises for finite input.

use kurbo::Point;

/// Default tolerance in canvas pixels.
///
/// Governs both "this pointer sample duplicates the previous one" and
/// "the eraser is close enough to a shape to count as a hit".
pub const MOVE_TOLERANCE: f64 = 2.0;

/// `|a - b| < tolerance`.
pub fn scalar_near(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Per-axis box test: both `|dx|` and `|dy|` below the tolerance.
///
/// This is deliberately not a Euclidean test.
pub fn point_near(p: Point, q: Point, tolerance: f64) -> bool {
    scalar_near(p.x, q.x, tolerance) && scalar_near(p.y, q.y, tolerance)
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}

/// Whether `value` lies between `a` and `b` (inclusive), in either order.
pub fn in_range(a: f64, b: f64, value: f64) -> bool {
    if a < b {
        value >= a && value <= b
    } else {
        value >= b && value <= a
    }
}

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}
