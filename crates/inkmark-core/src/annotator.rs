//! The annotation controller.
//!
//! [`Annotator`] owns the scene, the interaction state and the render-loop
//! bookkeeping, and drives a [`DrawSurface`]. Every pointer handler returns a
//! [`FrameRequest`] telling the host whether to start or cancel its frame
//! ticker; the host then calls [`Annotator::tick`] once per frame with the
//! token it was given.

use crate::config::AnnotatorConfig;
use crate::render_loop::{FrameRequest, RenderLoop, TickToken};
use crate::scene::Scene;
use crate::shapes::DrawStyle;
use crate::surface::{paint_background, paint_frame, DrawSurface, ExportedImage};
use crate::tools::{Action, ActiveDraw, ToolKind};
use kurbo::{Point, Rect, Size};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// What the pointer does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Draw,
    Erase,
}

/// Interaction state. Only one variant is live at a time, so drawing and
/// erasing can never both own the pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No pointer stroke in flight.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing(ActiveDraw),
    /// The eraser is pressed; holds the cursor not yet consumed by a frame.
    Erasing(Option<Point>),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// The stroke in flight, if any.
    pub fn active_draw(&self) -> Option<&ActiveDraw> {
        match self {
            InteractionState::Drawing(draw) => Some(draw),
            _ => None,
        }
    }
}

/// Freehand annotation controller over a drawing surface.
///
/// Until [`init`](Self::init) provides a surface, pointer input, clearing,
/// ticking and export do nothing. Tool and style changes are still recorded.
#[derive(Debug)]
pub struct Annotator<S: DrawSurface> {
    config: AnnotatorConfig,
    surface: Option<S>,
    scene: Scene,
    state: InteractionState,
    mode: Mode,
    tool: ToolKind,
    style: DrawStyle,
    render_loop: RenderLoop,
}

impl<S: DrawSurface> Annotator<S> {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            tool: config.initial_tool,
            style: config.initial_style,
            config,
            surface: None,
            scene: Scene::new(),
            state: InteractionState::Idle,
            mode: Mode::Draw,
            render_loop: RenderLoop::new(),
        }
    }

    /// Attach a surface and paint the background over it.
    ///
    /// Returns the previously attached surface, if any.
    pub fn init(&mut self, mut surface: S) -> Option<S> {
        log::info!(
            "Annotator initialized on a {}x{} surface",
            self.config.width,
            self.config.height
        );
        self.render_loop.stop();
        self.state = InteractionState::Idle;
        paint_background(&mut surface, self.bounds(), self.config.background);
        self.surface.replace(surface)
    }

    /// Detach the surface. The stroke in flight is discarded and the render
    /// loop stopped; committed shapes are kept.
    pub fn teardown(&mut self) -> Option<S> {
        self.render_loop.stop();
        self.state = InteractionState::Idle;
        let surface = self.surface.take();
        if surface.is_some() {
            log::info!("Annotator torn down");
        }
        surface
    }

    /// Change the surface size and repaint.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            log::warn!("Ignoring invalid surface size {}x{}", width, height);
            return;
        }
        self.config.width = width;
        self.config.height = height;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(Size::new(width, height));
        }
        self.render_frame();
    }

    /// Discard every shape and any stroke in flight, then repaint.
    pub fn clear(&mut self) -> FrameRequest {
        if self.surface.is_none() {
            return FrameRequest::None;
        }
        log::info!("Clearing {} shape(s)", self.scene.len());
        self.scene.clear();
        self.state = InteractionState::Idle;
        let request = self.render_loop.stop();
        self.render_frame();
        request
    }

    /// Select the tool for the next stroke, committing the stroke in flight.
    /// A pressed eraser keeps erasing.
    pub fn set_tool(&mut self, tool: ToolKind) -> FrameRequest {
        if tool == self.tool {
            return FrameRequest::None;
        }
        log::debug!("Tool changed: {} -> {}", self.tool.name(), tool.name());
        let request = if matches!(self.state, InteractionState::Drawing(_)) {
            self.finish_stroke()
        } else {
            FrameRequest::None
        };
        self.tool = tool;
        request
    }

    /// Change the style of future strokes. The stroke in flight keeps the
    /// style it started with.
    pub fn set_style(&mut self, style: DrawStyle) {
        log::debug!(
            "Style changed: width {} color {}",
            style.line_width,
            style.color
        );
        self.style = style;
    }

    /// Apply a host action.
    pub fn set_action(&mut self, action: Action) -> FrameRequest {
        match action {
            Action::Draw => self.set_mode(Mode::Draw),
            Action::Eraser => self.set_mode(Mode::Erase),
            Action::Clear => self.clear(),
            Action::Format(style) => {
                self.set_style(style);
                FrameRequest::None
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) -> FrameRequest {
        if mode == self.mode {
            return FrameRequest::None;
        }
        log::debug!("Mode changed: {:?} -> {:?}", self.mode, mode);
        let request = self.finish_stroke();
        self.mode = mode;
        request
    }

    /// Bring the state machine back to idle: a stroke in flight is committed,
    /// a pending eraser cursor is dropped.
    fn finish_stroke(&mut self) -> FrameRequest {
        if self.state.is_idle() {
            return FrameRequest::None;
        }
        if let InteractionState::Drawing(draw) = std::mem::take(&mut self.state) {
            if !draw.is_empty() {
                self.scene.commit(draw.into_shape());
            }
        }
        let request = self.render_loop.stop();
        self.render_frame();
        request
    }

    pub fn pointer_down(&mut self, point: Point) -> FrameRequest {
        if self.surface.is_none() {
            return FrameRequest::None;
        }
        // A press without a matching release: keep what was drawn.
        if let InteractionState::Drawing(draw) = std::mem::take(&mut self.state) {
            if !draw.is_empty() {
                self.scene.commit(draw.into_shape());
            }
        }

        self.state = match self.mode {
            Mode::Draw => {
                let mut draw = ActiveDraw::new(self.tool, self.style);
                draw.sample(point, self.config.hit.tolerance);
                InteractionState::Drawing(draw)
            }
            Mode::Erase => InteractionState::Erasing(Some(point)),
        };
        self.render_loop.start()
    }

    pub fn pointer_move(&mut self, point: Point) -> FrameRequest {
        if self.surface.is_none() {
            return FrameRequest::None;
        }
        match &mut self.state {
            InteractionState::Drawing(draw) => {
                draw.sample(point, self.config.hit.tolerance);
            }
            InteractionState::Erasing(cursor) => *cursor = Some(point),
            InteractionState::Idle => {}
        }
        FrameRequest::None
    }

    /// Finish the stroke: a drawing is committed (even if degenerate), an
    /// erase drops the cursor no frame has consumed. One final frame is painted.
    pub fn pointer_up(&mut self, point: Point) -> FrameRequest {
        if self.surface.is_none() {
            return FrameRequest::None;
        }
        match std::mem::take(&mut self.state) {
            InteractionState::Drawing(mut draw) => {
                draw.sample(point, self.config.hit.tolerance);
                self.scene.commit(draw.into_shape());
            }
            InteractionState::Erasing(Some(cursor)) => {
                log::debug!("Dropping unconsumed eraser cursor at {:?}", cursor);
            }
            InteractionState::Erasing(None) | InteractionState::Idle => {}
        }
        let request = self.render_loop.stop();
        self.render_frame();
        request
    }

    /// Paint one frame for the live run identified by `token`.
    ///
    /// Returns `false` when the token is stale or no surface is attached; the
    /// host must then stop rescheduling.
    pub fn tick(&mut self, token: TickToken) -> bool {
        if self.surface.is_none() {
            return false;
        }
        if !self.render_loop.is_current(token) {
            log::warn!("Ignoring frame for stale render loop {}", token.generation());
            return false;
        }
        self.render_frame();
        true
    }

    /// Apply the pending eraser cursor, then repaint the whole surface.
    pub fn render_frame(&mut self) {
        let bounds = self.bounds();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let InteractionState::Erasing(cursor) = &mut self.state {
            if let Some(cursor) = cursor.take() {
                self.scene.erase_at(cursor, &self.config.hit);
            }
        }
        paint_frame(
            surface,
            bounds,
            self.config.background,
            &self.scene,
            self.state.active_draw(),
        );
    }

    /// Export the surface as PNG.
    ///
    /// Without a filename, `annotate_<unix-millis>.png` is used. Returns
    /// `None` when there is no surface or it produced no data.
    pub fn export_image(&mut self, filename: Option<&str>) -> Option<ExportedImage> {
        let surface = self.surface.as_mut()?;
        let bytes = surface.export_png()?;
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(default_export_filename);
        log::debug!("Exported {} bytes as {}", bytes.len(), filename);
        Some(ExportedImage { filename, bytes })
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.width, self.config.height)
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn action_mode(&self) -> Mode {
        self.mode
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether the render loop is live.
    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }
}

fn default_export_filename() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("annotate_{millis}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{SerializableColor, Shape};
    use kurbo::{BezPath, Ellipse};

    #[derive(Debug, Default)]
    struct MockSurface {
        frames: usize,
        strokes: usize,
        png: Option<Vec<u8>>,
        size: Option<Size>,
    }

    impl DrawSurface for MockSurface {
        fn clear_rect(&mut self, _rect: Rect) {
            self.frames += 1;
        }
        fn fill_rect(&mut self, _rect: Rect, _color: SerializableColor) {}
        fn fill_circle(&mut self, _center: Point, _radius: f64, _color: SerializableColor) {
            self.strokes += 1;
        }
        fn stroke_path(&mut self, _path: &BezPath, _style: &DrawStyle) {
            self.strokes += 1;
        }
        fn stroke_rect(&mut self, _rect: Rect, _style: &DrawStyle) {
            self.strokes += 1;
        }
        fn stroke_ellipse(&mut self, _ellipse: Ellipse, _style: &DrawStyle) {
            self.strokes += 1;
        }
        fn export_png(&mut self) -> Option<Vec<u8>> {
            self.png.clone()
        }
        fn resize(&mut self, size: Size) {
            self.size = Some(size);
        }
    }

    fn annotator() -> Annotator<MockSurface> {
        let mut annotator = Annotator::new(AnnotatorConfig::default());
        annotator.init(MockSurface::default());
        annotator
    }

    fn drag(annotator: &mut Annotator<MockSurface>, from: Point, to: Point) {
        annotator.pointer_down(from);
        annotator.pointer_move(to);
        annotator.pointer_up(to);
    }

    fn start_token(request: FrameRequest) -> TickToken {
        match request {
            FrameRequest::Start(token) => token,
            other => panic!("expected start, got {other:?}"),
        }
    }

    #[test]
    fn test_init_paints_background() {
        let annotator = annotator();
        assert!(annotator.is_initialized());
        assert_eq!(annotator.surface().unwrap().frames, 1);
        assert_eq!(annotator.tool(), ToolKind::Curve);
        assert_eq!(annotator.action_mode(), Mode::Draw);
    }

    #[test]
    fn test_rectangle_stroke_commits() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Rectangle);
        let token = start_token(annotator.pointer_down(Point::new(0.0, 0.0)));
        annotator.pointer_move(Point::new(5.0, 5.0));
        assert!(annotator.tick(token));
        assert_eq!(annotator.state().active_draw().unwrap().points.len(), 2);

        assert_eq!(annotator.pointer_up(Point::new(10.0, 10.0)), FrameRequest::Stop);
        assert!(annotator.state().is_idle());
        assert!(!annotator.is_rendering());
        assert!(!annotator.tick(token));
        assert_eq!(
            annotator.scene().shapes(),
            &[Shape::new(
                ToolKind::Rectangle,
                vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
                DrawStyle::default(),
            )]
        );
    }

    #[test]
    fn test_curve_samples_are_deduplicated() {
        let mut annotator = annotator();
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(0.5, 0.5));
        annotator.pointer_move(Point::new(10.0, 0.0));
        annotator.pointer_move(Point::new(20.0, 0.0));
        annotator.pointer_up(Point::new(20.5, 0.0));
        let shape = &annotator.scene().shapes()[0];
        assert_eq!(shape.kind, ToolKind::Curve);
        assert_eq!(shape.points.len(), 3);
    }

    #[test]
    fn test_degenerate_stroke_commits() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Segment);
        annotator.pointer_down(Point::new(4.0, 4.0));
        annotator.pointer_up(Point::new(4.0, 4.0));
        assert_eq!(annotator.scene().len(), 1);
        // Painted as a dot.
        assert!(annotator.surface().unwrap().strokes >= 1);
    }

    #[test]
    fn test_erase_removes_only_the_hit_shape() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Rectangle);
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        drag(&mut annotator, Point::new(100.0, 100.0), Point::new(150.0, 150.0));
        assert_eq!(annotator.scene().len(), 2);

        annotator.set_action(Action::Eraser);
        let token = start_token(annotator.pointer_down(Point::new(300.0, 300.0)));
        assert!(annotator.tick(token));
        assert_eq!(annotator.scene().len(), 2);

        annotator.pointer_move(Point::new(5.0, 0.0));
        assert!(annotator.tick(token));
        assert_eq!(annotator.scene().len(), 1);
        assert_eq!(annotator.scene().shapes()[0].points[0], Point::new(100.0, 100.0));

        assert_eq!(annotator.pointer_up(Point::new(5.0, 0.0)), FrameRequest::Stop);
        assert!(annotator.state().is_idle());
    }

    #[test]
    fn test_erase_removes_every_match_in_one_tick() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Ellipse);
        for _ in 0..3 {
            drag(&mut annotator, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        }
        annotator.set_action(Action::Eraser);
        let token = start_token(annotator.pointer_down(Point::new(5.0, 5.0)));
        assert!(annotator.tick(token));
        assert!(annotator.scene().is_empty());
        annotator.pointer_up(Point::new(5.0, 5.0));
    }

    #[test]
    fn test_release_drops_unconsumed_cursor() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Rectangle);
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        annotator.set_action(Action::Eraser);
        annotator.pointer_down(Point::new(300.0, 300.0));
        annotator.pointer_move(Point::new(5.0, 0.0));
        assert_eq!(annotator.pointer_up(Point::new(5.0, 0.0)), FrameRequest::Stop);
        assert_eq!(annotator.scene().len(), 1);
        assert!(annotator.state().is_idle());
    }

    #[test]
    fn test_tool_change_keeps_eraser_pressed() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Rectangle);
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        annotator.set_action(Action::Eraser);
        let token = start_token(annotator.pointer_down(Point::new(300.0, 300.0)));

        assert_eq!(annotator.set_tool(ToolKind::Ellipse), FrameRequest::None);
        assert_eq!(annotator.tool(), ToolKind::Ellipse);
        assert!(matches!(annotator.state(), InteractionState::Erasing(_)));
        assert!(annotator.is_rendering());

        annotator.pointer_move(Point::new(5.0, 0.0));
        assert!(annotator.tick(token));
        assert!(annotator.scene().is_empty());
    }

    #[test]
    fn test_switch_to_eraser_commits_stroke() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Segment);
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(40.0, 20.0));

        assert_eq!(annotator.set_action(Action::Eraser), FrameRequest::Stop);
        assert_eq!(annotator.action_mode(), Mode::Erase);
        assert!(annotator.state().is_idle());
        assert_eq!(annotator.scene().len(), 1);
        assert_eq!(
            annotator.scene().shapes()[0].points,
            vec![Point::new(0.0, 0.0), Point::new(40.0, 20.0)]
        );
    }

    #[test]
    fn test_switch_tool_commits_with_original_tool() {
        let mut annotator = annotator();
        annotator.pointer_down(Point::new(0.0, 0.0));
        annotator.pointer_move(Point::new(30.0, 0.0));
        annotator.set_tool(ToolKind::Ellipse);
        assert_eq!(annotator.scene().shapes()[0].kind, ToolKind::Curve);
        assert_eq!(annotator.tool(), ToolKind::Ellipse);
    }

    #[test]
    fn test_switch_to_draw_drops_cursor() {
        let mut annotator = annotator();
        annotator.set_tool(ToolKind::Rectangle);
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        annotator.set_action(Action::Eraser);
        annotator.pointer_down(Point::new(0.0, 5.0));
        assert_eq!(annotator.set_action(Action::Draw), FrameRequest::Stop);
        assert_eq!(annotator.scene().len(), 1);
        assert!(annotator.state().is_idle());
        assert_eq!(annotator.action_mode(), Mode::Draw);
    }

    #[test]
    fn test_clear_from_every_state() {
        // Idle
        let mut annotator = annotator();
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        annotator.clear();
        assert!(annotator.scene().is_empty());

        // Drawing
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        annotator.pointer_down(Point::new(5.0, 5.0));
        annotator.pointer_move(Point::new(25.0, 25.0));
        assert_eq!(annotator.set_action(Action::Clear), FrameRequest::Stop);
        assert!(annotator.scene().is_empty());
        assert!(annotator.state().is_idle());

        // Erasing
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        annotator.set_action(Action::Eraser);
        annotator.pointer_down(Point::new(500.0, 500.0));
        annotator.clear();
        assert!(annotator.scene().is_empty());
        assert!(annotator.state().is_idle());
        assert_eq!(annotator.action_mode(), Mode::Erase);
    }

    #[test]
    fn test_format_affects_future_strokes_only() {
        let mut annotator = annotator();
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(50.0, 50.0));

        annotator.pointer_down(Point::new(0.0, 0.0));
        let red = DrawStyle::parse(6.0, "#ff0000").unwrap();
        annotator.set_action(Action::Format(red));
        annotator.pointer_up(Point::new(30.0, 30.0));
        drag(&mut annotator, Point::new(0.0, 0.0), Point::new(50.0, 50.0));

        let styles: Vec<DrawStyle> = annotator.scene().iter().map(|s| s.style).collect();
        assert_eq!(styles, vec![DrawStyle::default(), DrawStyle::default(), red]);
        assert_eq!(annotator.style(), red);
    }

    #[test]
    fn test_no_surface_is_a_no_op() {
        let mut annotator: Annotator<MockSurface> = Annotator::new(AnnotatorConfig::default());
        assert_eq!(annotator.pointer_down(Point::new(1.0, 1.0)), FrameRequest::None);
        assert_eq!(annotator.pointer_up(Point::new(9.0, 9.0)), FrameRequest::None);
        assert_eq!(annotator.clear(), FrameRequest::None);
        assert!(annotator.scene().is_empty());
        assert!(annotator.export_image(None).is_none());
        annotator.set_tool(ToolKind::Ellipse);
        assert_eq!(annotator.tool(), ToolKind::Ellipse);
        annotator.render_frame();
    }

    #[test]
    fn test_teardown_discards_stroke() {
        let mut annotator = annotator();
        let token = start_token(annotator.pointer_down(Point::new(0.0, 0.0)));
        assert!(annotator.teardown().is_some());
        assert!(!annotator.tick(token));
        assert!(annotator.state().is_idle());
        assert!(annotator.scene().is_empty());
        assert!(annotator.teardown().is_none());
    }

    #[test]
    fn test_restart_invalidates_previous_ticker() {
        let mut annotator = annotator();
        let first = start_token(annotator.pointer_down(Point::new(0.0, 0.0)));
        let second = start_token(annotator.pointer_down(Point::new(50.0, 50.0)));
        assert!(!annotator.tick(first));
        assert!(annotator.tick(second));
        // The unreleased stroke was kept.
        assert_eq!(annotator.scene().len(), 1);
    }

    #[test]
    fn test_resize() {
        let mut annotator = annotator();
        annotator.resize(1024.0, 768.0);
        assert!((annotator.config().width - 1024.0).abs() < f64::EPSILON);
        assert_eq!(annotator.surface().unwrap().frames, 2);
        assert_eq!(annotator.surface().unwrap().size, Some(Size::new(1024.0, 768.0)));
        annotator.resize(0.0, 768.0);
        assert!((annotator.config().width - 1024.0).abs() < f64::EPSILON);
        assert_eq!(annotator.surface().unwrap().frames, 2);
    }

    #[test]
    fn test_export() {
        let mut annotator = annotator();
        assert!(annotator.export_image(Some("out.png")).is_none());

        annotator.surface_mut().unwrap().png = Some(vec![1, 2, 3]);
        let image = annotator.export_image(Some("out.png")).unwrap();
        assert_eq!(image.filename, "out.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);

        let image = annotator.export_image(None).unwrap();
        assert!(image.filename.starts_with("annotate_"));
        assert!(image.filename.ends_with(".png"));
    }
}
