//! Tools, host actions and the in-progress stroke.

use crate::error::AnnotateError;
use crate::geometry::point_near;
use crate::shapes::{DrawStyle, Shape};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    Segment,
    SegmentArrow,
    Rectangle,
    Ellipse,
    #[default]
    Curve,
}

impl ToolKind {
    /// Tools defined by an anchor and a live corner (exactly two samples).
    pub fn is_two_point(self) -> bool {
        !matches!(self, ToolKind::Curve)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Segment => "Segment",
            ToolKind::SegmentArrow => "Arrow",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Curve => "Curve",
        }
    }
}

impl FromStr for ToolKind {
    type Err = AnnotateError;

    /// Accepts display names and snake_case variant names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segment" | "line" => Ok(ToolKind::Segment),
            "arrow" | "segment_arrow" | "segmentarrow" => Ok(ToolKind::SegmentArrow),
            "rectangle" | "rect" => Ok(ToolKind::Rectangle),
            "ellipse" => Ok(ToolKind::Ellipse),
            "curve" | "pen" => Ok(ToolKind::Curve),
            _ => Err(AnnotateError::UnknownTool(s.to_string())),
        }
    }
}

/// Host-level action selecting what the pointer does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Pointer draws with the current tool.
    Draw,
    /// Pointer erases whole shapes it touches.
    Eraser,
    /// Discard every shape.
    Clear,
    /// Change the style of future strokes.
    Format(DrawStyle),
}

/// The stroke currently being drawn.
///
/// The style is captured when the stroke starts; later style changes only
/// affect the next stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDraw {
    pub kind: ToolKind,
    pub points: Vec<Point>,
    pub style: DrawStyle,
}

impl ActiveDraw {
    /// Start an empty stroke.
    pub fn new(kind: ToolKind, style: DrawStyle) -> Self {
        Self {
            kind,
            points: Vec::new(),
            style,
        }
    }

    /// Record a pointer sample using the tool's rule.
    ///
    /// Two-point tools keep an anchor and overwrite the live corner. Curves
    /// append the sample unless it is within `tolerance` of the previous one.
    /// Returns whether the stroke changed.
    pub fn sample(&mut self, point: Point, tolerance: f64) -> bool {
        if self.kind.is_two_point() {
            match self.points.len() {
                0 => {
                    self.points.push(point);
                    self.points.push(point);
                }
                1 => self.points.push(point),
                _ => self.points[1] = point,
            }
            return true;
        }

        if let Some(last) = self.points.last() {
            if point_near(*last, point, tolerance) {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    /// Number of samples recorded so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finish the stroke.
    pub fn into_shape(self) -> Shape {
        Shape::new(self.kind, self.points, self.style)
    }
}
