//! Shape definitions and per-kind hit-testing.

mod curve;
mod ellipse;
mod rectangle;
mod segment;

pub use curve::CurveChain;
pub use ellipse::inscribed as inscribed_ellipse;
pub use rectangle::bounds as corner_rect;
pub use segment::{arrow_head, ARROW_HEAD_LENGTH};

use crate::config::HitConfig;
use crate::error::{AnnotateError, AnnotateResult};
use crate::tools::ToolKind;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA8 color token attached to a style.
///
/// Serialized as a CSS hex string (`#rrggbbaa`, or `#rrggbb` when opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> AnnotateResult<Self> {
        let invalid = || AnnotateError::InvalidColor(color.to_string());
        let hex = color.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => Ok(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
                255,
            )),
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// CSS `rgba(...)` form, as accepted by a 2D canvas context.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for SerializableColor {
    type Err = AnnotateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = AnnotateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_string()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke style captured by a shape when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Stroke color.
    pub color: SerializableColor,
}

impl DrawStyle {
    /// Create a style, rejecting non-positive or non-finite widths.
    pub fn new(line_width: f64, color: SerializableColor) -> AnnotateResult<Self> {
        if !(line_width.is_finite() && line_width > 0.0) {
            return Err(AnnotateError::InvalidLineWidth(line_width));
        }
        Ok(Self { line_width, color })
    }

    /// Parse a style from a width and a CSS hex color.
    pub fn parse(line_width: f64, color: &str) -> AnnotateResult<Self> {
        Self::new(line_width, SerializableColor::from_hex(color)?)
    }

    /// Get the color as a peniko Color.
    pub fn peniko_color(&self) -> Color {
        self.color.into()
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            color: SerializableColor::black(),
        }
    }
}

/// A committed shape: the tool that drew it, its raw samples and its style.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ToolKind,
    pub points: Vec<Point>,
    pub style: DrawStyle,
}

impl Shape {
    pub fn new(kind: ToolKind, points: Vec<Point>, style: DrawStyle) -> Self {
        Self { kind, points, style }
    }

    /// Check whether `target` lies on or near this shape's outline.
    pub fn hit_test(&self, target: Point, config: &HitConfig) -> bool {
        hit_test(self.kind, &self.points, target, config)
    }
}

/// Run the hit-tester matching `kind` against raw shape points.
pub fn hit_test(kind: ToolKind, points: &[Point], target: Point, config: &HitConfig) -> bool {
    match kind {
        ToolKind::Segment | ToolKind::SegmentArrow => {
            segment::hit_test(points, target, config.tolerance)
        }
        ToolKind::Rectangle => rectangle::hit_test(points, target, config.tolerance),
        ToolKind::Ellipse => ellipse::hit_test(points, target, config.tolerance),
        ToolKind::Curve => curve::hit_test(points, target, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#fff").unwrap(), SerializableColor::white());
        assert_eq!(
            SerializableColor::from_hex("#1a2B3c").unwrap(),
            SerializableColor::new(0x1a, 0x2b, 0x3c, 255)
        );
        assert_eq!(
            "#00000080".parse::<SerializableColor>().unwrap(),
            SerializableColor::new(0, 0, 0, 128)
        );
        assert!(SerializableColor::from_hex("red").is_err());
        assert!(SerializableColor::from_hex("#12345").is_err());
        assert!(SerializableColor::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_color_display_and_css() {
        assert_eq!(SerializableColor::new(255, 0, 16, 255).to_string(), "#ff0010");
        assert_eq!(SerializableColor::transparent().to_string(), "#00000000");
        assert_eq!(SerializableColor::white().to_css(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn test_color_peniko_round_trip() {
        let color = SerializableColor::new(10, 20, 30, 40);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
    }

    #[test]
    fn test_style_validation() {
        assert!(DrawStyle::new(0.0, SerializableColor::black()).is_err());
        assert!(DrawStyle::new(-1.0, SerializableColor::black()).is_err());
        assert!(DrawStyle::new(f64::NAN, SerializableColor::black()).is_err());
        let style = DrawStyle::parse(3.0, "#ff0000").unwrap();
        assert!((style.line_width - 3.0).abs() < f64::EPSILON);
        assert_eq!(style.color, SerializableColor::new(255, 0, 0, 255));
    }

    #[test]
    fn test_hit_dispatch_uses_kind() {
        let config = HitConfig::default();
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        // Same points: the rectangle border passes through (5, 0), the diagonal does not.
        let rect = Shape::new(ToolKind::Rectangle, points.clone(), DrawStyle::default());
        let segment = Shape::new(ToolKind::Segment, points.clone(), DrawStyle::default());
        let arrow = Shape::new(ToolKind::SegmentArrow, points, DrawStyle::default());
        assert!(rect.hit_test(Point::new(5.0, 0.0), &config));
        assert!(!segment.hit_test(Point::new(5.0, 0.0), &config));
        assert!(segment.hit_test(Point::new(5.0, 5.0), &config));
        assert!(arrow.hit_test(Point::new(5.0, 5.0), &config));
    }
}
