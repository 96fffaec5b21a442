//! A surface that records draw calls instead of rasterizing them.

use inkmark_core::shapes::{DrawStyle, SerializableColor};
use inkmark_core::surface::DrawSurface;
use kurbo::{BezPath, Ellipse, Point, Rect};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect(Rect),
    FillRect {
        rect: Rect,
        color: SerializableColor,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: SerializableColor,
    },
    StrokePath {
        path: BezPath,
        style: DrawStyle,
    },
    StrokeRect {
        rect: Rect,
        style: DrawStyle,
    },
    StrokeEllipse {
        ellipse: Ellipse,
        style: DrawStyle,
    },
}

impl DrawCommand {
    /// Whether this command paints something visible.
    pub fn is_stroke(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillCircle { .. }
                | DrawCommand::StrokePath { .. }
                | DrawCommand::StrokeRect { .. }
                | DrawCommand::StrokeEllipse { .. }
        )
    }
}

/// Records every draw call, grouped into frames by `clear_rect`.
///
/// Used by the headless replay tool; it has no raster to export.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    frame_start: usize,
    frames: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands since the last clear.
    pub fn current_frame(&self) -> &[DrawCommand] {
        &self.commands[self.frame_start..]
    }

    /// Number of frames started (clears seen).
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Shapes painted in the current frame.
    pub fn stroke_count(&self) -> usize {
        self.current_frame().iter().filter(|cmd| cmd.is_stroke()).count()
    }
}

impl DrawSurface for DisplayList {
    fn clear_rect(&mut self, rect: Rect) {
        self.frame_start = self.commands.len();
        self.frames += 1;
        self.commands.push(DrawCommand::ClearRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: SerializableColor) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &DrawStyle) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            style: *style,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, style: &DrawStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            style: *style,
        });
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, style: &DrawStyle) {
        self.commands.push(DrawCommand::StrokeEllipse {
            ellipse,
            style: *style,
        });
    }

    /// Nothing is rasterized, so there is never an image.
    fn export_png(&mut self) -> Option<Vec<u8>> {
        None
    }
}
