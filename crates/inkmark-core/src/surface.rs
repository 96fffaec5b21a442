//! The drawing collaborator and the painters that drive it.

use crate::scene::Scene;
use crate::shapes::{arrow_head, corner_rect, inscribed_ellipse, CurveChain, DrawStyle, SerializableColor};
use crate::tools::{ActiveDraw, ToolKind};
use kurbo::{BezPath, Ellipse, Point, Rect, Size};

/// Minimal set of primitives a rendering backend must provide.
pub trait DrawSurface {
    /// Reset a region to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Fill a region with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: SerializableColor);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Point, radius: f64, color: SerializableColor);

    /// Stroke an open path.
    fn stroke_path(&mut self, path: &BezPath, style: &DrawStyle);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, style: &DrawStyle);

    /// Stroke an ellipse outline.
    fn stroke_ellipse(&mut self, ellipse: Ellipse, style: &DrawStyle);

    /// Encode the current raster as PNG. `None` when nothing could be produced.
    fn export_png(&mut self) -> Option<Vec<u8>>;

    /// The annotator's logical size changed.
    fn resize(&mut self, _size: Size) {}
}

/// A raster export and the filename it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Paint one shape from its raw samples.
///
/// Degenerate input never fails: a zero-length segment or a one-sample curve
/// becomes a dot, and shapes missing their second corner draw nothing.
pub fn paint_shape<S: DrawSurface + ?Sized>(
    surface: &mut S,
    kind: ToolKind,
    points: &[Point],
    style: &DrawStyle,
) {
    match kind {
        ToolKind::Segment | ToolKind::SegmentArrow => {
            let [start, end] = match points {
                [start, end, ..] => [*start, *end],
                _ => return,
            };
            if start == end {
                surface.fill_circle(start, style.line_width / 2.0, style.color);
                return;
            }

            let mut path = BezPath::new();
            path.move_to(start);
            path.line_to(end);
            if kind == ToolKind::SegmentArrow {
                if let Some((left, right)) = arrow_head(start, end, style.line_width) {
                    path.move_to(left);
                    path.line_to(end);
                    path.line_to(right);
                }
            }
            surface.stroke_path(&path, style);
        }
        ToolKind::Rectangle => {
            if let [a, b, ..] = points {
                surface.stroke_rect(corner_rect(*a, *b), style);
            }
        }
        ToolKind::Ellipse => {
            if let [a, b, ..] = points {
                surface.stroke_ellipse(inscribed_ellipse(*a, *b), style);
            }
        }
        ToolKind::Curve => match points {
            [] => {}
            [p] => surface.fill_circle(*p, style.line_width / 2.0, style.color),
            _ => surface.stroke_path(&CurveChain::from_points(points).to_path(), style),
        },
    }
}

/// Reset the whole surface to the background color.
pub fn paint_background<S: DrawSurface + ?Sized>(
    surface: &mut S,
    bounds: Rect,
    background: SerializableColor,
) {
    surface.clear_rect(bounds);
    surface.fill_rect(bounds, background);
}

/// Repaint a full frame: background, committed shapes in order, then the
/// in-progress stroke on top.
pub fn paint_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    bounds: Rect,
    background: SerializableColor,
    scene: &Scene,
    active: Option<&ActiveDraw>,
) {
    paint_background(surface, bounds, background);
    for shape in scene.iter() {
        paint_shape(surface, shape.kind, &shape.points, &shape.style);
    }
    if let Some(active) = active {
        paint_shape(surface, active.kind, &active.points, &active.style);
    }
}
