//! Vello-based surface implementation.

use crate::export::{RasterReadback, RenderResult};
use inkmark_core::shapes::{DrawStyle, SerializableColor};
use inkmark_core::surface::DrawSurface;
use kurbo::{Affine, BezPath, Cap, Circle, Ellipse, Join, Point, Rect, Size, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Surface that builds a Vello scene for GPU rendering.
///
/// Vello scenes are retained, so a frame clear (anchored at the origin)
/// resets the scene. The host renders [`scene`](Self::scene) to a texture and, to make
/// exports possible, hands the pixels back through
/// [`set_readback`](Self::set_readback).
pub struct VelloSurface {
    /// The Vello scene being built.
    scene: Scene,
    /// Logical surface size.
    size: Size,
    /// Last raster provided by the host.
    readback: Option<RasterReadback>,
}

impl VelloSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scene: Scene::new(),
            size: Size::new(width, height),
            readback: None,
        }
    }

    /// Get the scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the built scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Store the pixels of the last rendered frame for export.
    pub fn set_readback(&mut self, rgba_data: Vec<u8>, width: u32, height: u32) -> RenderResult<()> {
        self.readback = Some(RasterReadback::new(rgba_data, width, height)?);
        Ok(())
    }

    fn stroke_for(style: &DrawStyle) -> Stroke {
        Stroke::new(style.line_width)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }
}

impl DrawSurface for VelloSurface {
    fn clear_rect(&mut self, rect: Rect) {
        // Frames clear from the origin and repaint everything, so whatever the
        // scene holds outside `rect` is stale too.
        if rect.x0 <= 0.0 && rect.y0 <= 0.0 {
            self.scene.reset();
        } else {
            // Encoded draws cannot be removed from a retained scene.
            log::debug!("Ignoring partial clear of {:?}", rect);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: SerializableColor) {
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::from(color), None, &rect);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        let circle = Circle::new(center, radius);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::from(color), None, &circle);
    }

    fn stroke_path(&mut self, path: &BezPath, style: &DrawStyle) {
        self.scene.stroke(
            &Self::stroke_for(style),
            Affine::IDENTITY,
            style.peniko_color(),
            None,
            path,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, style: &DrawStyle) {
        self.scene.stroke(
            &Self::stroke_for(style),
            Affine::IDENTITY,
            style.peniko_color(),
            None,
            &rect,
        );
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, style: &DrawStyle) {
        self.scene.stroke(
            &Self::stroke_for(style),
            Affine::IDENTITY,
            style.peniko_color(),
            None,
            &ellipse,
        );
    }

    fn resize(&mut self, size: Size) {
        log::debug!("Vello surface resized to {}x{}", size.width, size.height);
        self.size = size;
    }

    fn export_png(&mut self) -> Option<Vec<u8>> {
        let Some(readback) = self.readback.as_ref() else {
            log::debug!("No readback to export");
            return None;
        };
        match readback.encode_png() {
            Ok(png) => Some(png),
            Err(e) => {
                log::error!("Failed to encode PNG: {}", e);
                None
            }
        }
    }
}
