//! WebAssembly entry point and the browser host.
//!
//! [`WebAnnotator`] wraps an [`Annotator`] drawing into a
//! `CanvasRenderingContext2d`, wires mouse listeners on the canvas and runs
//! the render loop on `requestAnimationFrame`.

use base64::{Engine, engine::general_purpose::STANDARD};
use inkmark_core::shapes::{DrawStyle, SerializableColor};
use inkmark_core::surface::DrawSurface;
use inkmark_core::{Action, Annotator, AnnotatorConfig, FrameRequest, TickToken, ToolKind};
use kurbo::{BezPath, Ellipse, PathEl, Point, Rect};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Draw surface backed by a 2D canvas context.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn apply_stroke_style(&self, style: &DrawStyle) {
        self.ctx.set_line_width(style.line_width);
        self.ctx.set_stroke_style_str(&style.color.to_css());
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl DrawSurface for Canvas2dSurface {
    fn clear_rect(&mut self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_rect(&mut self, rect: Rect, color: SerializableColor) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(center.x, center.y, radius, 0.0, TAU) {
            log::warn!("arc failed: {:?}", e);
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &BezPath, style: &DrawStyle) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
        self.apply_stroke_style(style);
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, rect: Rect, style: &DrawStyle) {
        self.apply_stroke_style(style);
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, style: &DrawStyle) {
        let center = ellipse.center();
        let radii = ellipse.radii();
        self.ctx.begin_path();
        if let Err(e) = self.ctx.ellipse(
            center.x,
            center.y,
            radii.x,
            radii.y,
            ellipse.rotation(),
            0.0,
            TAU,
        ) {
            log::warn!("ellipse failed: {:?}", e);
            return;
        }
        self.apply_stroke_style(style);
        self.ctx.stroke();
    }

    fn export_png(&mut self) -> Option<Vec<u8>> {
        let url = self.canvas.to_data_url_with_type("image/png").ok()?;
        let encoded = url.strip_prefix(PNG_DATA_URL_PREFIX)?;
        STANDARD.decode(encoded).ok()
    }
}

type MouseListener = Closure<dyn FnMut(MouseEvent)>;

/// Host state shared with DOM callbacks.
struct Host {
    this: Weak<RefCell<Host>>,
    annotator: Annotator<Canvas2dSurface>,
    canvas: Option<HtmlCanvasElement>,
    listeners: Vec<(&'static str, MouseListener)>,
    frame_callback: Option<Closure<dyn FnMut()>>,
    frame_handle: Option<i32>,
}

impl Host {
    fn apply(&mut self, request: FrameRequest) {
        match request {
            FrameRequest::None => {}
            FrameRequest::Start(token) => self.start_frames(token),
            FrameRequest::Stop => self.cancel_frame(),
        }
    }

    fn start_frames(&mut self, token: TickToken) {
        self.cancel_frame();
        let this = self.this.clone();
        self.frame_callback = Some(Closure::wrap(Box::new(move || {
            let Some(host) = this.upgrade() else {
                return;
            };
            let Ok(mut host) = host.try_borrow_mut() else {
                log::warn!("Frame callback re-entered; skipping");
                return;
            };
            host.frame_handle = None;
            if host.annotator.tick(token) {
                host.schedule_frame();
            }
        }) as Box<dyn FnMut()>));
        self.schedule_frame();
    }

    fn schedule_frame(&mut self) {
        let (Some(window), Some(callback)) = (web_sys::window(), self.frame_callback.as_ref())
        else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => self.frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
            if let Err(e) = window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn attach_listeners(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let handlers: [(&'static str, fn(&mut Annotator<Canvas2dSurface>, Point) -> FrameRequest); 3] = [
            ("mousedown", Annotator::pointer_down),
            ("mousemove", Annotator::pointer_move),
            ("mouseup", Annotator::pointer_up),
        ];
        for (name, handler) in handlers {
            let this = self.this.clone();
            let listener = Closure::wrap(Box::new(move |event: MouseEvent| {
                let Some(host) = this.upgrade() else {
                    return;
                };
                let Ok(mut host) = host.try_borrow_mut() else {
                    log::warn!("{} listener re-entered; skipping", name);
                    return;
                };
                let point = Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()));
                let request = handler(&mut host.annotator, point);
                host.apply(request);
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            self.listeners.push((name, listener));
        }
        Ok(())
    }

    fn detach_listeners(&mut self) {
        let Some(canvas) = self.canvas.take() else {
            self.listeners.clear();
            return;
        };
        for (name, listener) in self.listeners.drain(..) {
            if let Err(e) =
                canvas.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", name, e);
            }
        }
    }
}

/// PNG export handed back to JavaScript.
#[wasm_bindgen]
pub struct ExportedPng {
    filename: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl ExportedPng {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// PNG bytes as a `Uint8Array`.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// The annotation layer as seen from JavaScript.
#[wasm_bindgen]
pub struct WebAnnotator {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl WebAnnotator {
    /// Create an annotator, optionally from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebAnnotator, JsValue> {
        let config = match config_json {
            Some(json) => AnnotatorConfig::from_json(&json).map_err(to_js)?,
            None => AnnotatorConfig::default(),
        };
        let host = Rc::new_cyclic(|this| {
            RefCell::new(Host {
                this: this.clone(),
                annotator: Annotator::new(config),
                canvas: None,
                listeners: Vec::new(),
                frame_callback: None,
                frame_handle: None,
            })
        });
        Ok(WebAnnotator { host })
    }

    /// Attach to a canvas: paint the background and start listening.
    pub fn init(&self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let surface = Canvas2dSurface::new(canvas.clone())?;
        let mut host = self.host.borrow_mut();
        host.cancel_frame();
        host.detach_listeners();
        host.annotator.init(surface);
        host.annotator
            .resize(f64::from(canvas.width()), f64::from(canvas.height()));
        host.attach_listeners(&canvas)?;
        host.canvas = Some(canvas);
        Ok(())
    }

    /// Stop listening and release the canvas. Committed shapes are kept.
    pub fn teardown(&self) {
        let mut host = self.host.borrow_mut();
        host.cancel_frame();
        host.detach_listeners();
        host.frame_callback = None;
        host.annotator.teardown();
    }

    pub fn clear(&self) {
        let mut host = self.host.borrow_mut();
        let request = host.annotator.clear();
        host.apply(request);
    }

    /// Select a tool by name (`segment`, `arrow`, `rectangle`, `ellipse`, `curve`).
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool: ToolKind = name.parse().map_err(to_js)?;
        let mut host = self.host.borrow_mut();
        let request = host.annotator.set_tool(tool);
        host.apply(request);
        Ok(())
    }

    /// Apply `draw`, `eraser`, `clear` or `format`. A bare `format` keeps the
    /// current style; use `setStyle` to change it.
    #[wasm_bindgen(js_name = setAction)]
    pub fn set_action(&self, name: &str) -> Result<(), JsValue> {
        let mut host = self.host.borrow_mut();
        let action = match name {
            "draw" => Action::Draw,
            "eraser" => Action::Eraser,
            "clear" => Action::Clear,
            "format" => Action::Format(host.annotator.style()),
            other => return Err(JsValue::from_str(&format!("Unknown action: {other}"))),
        };
        let request = host.annotator.set_action(action);
        host.apply(request);
        Ok(())
    }

    /// Set the style for future strokes from a width and a CSS hex color.
    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&self, line_width: f64, color: &str) -> Result<(), JsValue> {
        let style = DrawStyle::parse(line_width, color).map_err(to_js)?;
        self.host
            .borrow_mut()
            .annotator
            .set_action(Action::Format(style));
        Ok(())
    }

    #[wasm_bindgen(js_name = exportImage)]
    pub fn export_image(&self, filename: Option<String>) -> Option<ExportedPng> {
        let image = self
            .host
            .borrow_mut()
            .annotator
            .export_image(filename.as_deref())?;
        Some(ExportedPng {
            filename: image.filename,
            bytes: image.bytes,
        })
    }

    #[wasm_bindgen(js_name = shapeCount)]
    pub fn shape_count(&self) -> usize {
        self.host.borrow().annotator.scene().len()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Install the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }
    log::info!("Starting Inkmark (WASM)");
}
