//! Pointer-event script replay.
//!
//! A script is a JSON document with an optional annotator configuration and a
//! list of events:
//!
//! ```json
//! {
//!   "config": { "width": 400, "height": 300 },
//!   "events": [
//!     { "type": "tool", "tool": "rectangle" },
//!     { "type": "down", "x": 10, "y": 10 },
//!     { "type": "move", "x": 60, "y": 40 },
//!     { "type": "frame" },
//!     { "type": "up", "x": 80, "y": 50 }
//!   ]
//! }
//! ```

use inkmark_core::{
    Action, AnnotateError, Annotator, AnnotatorConfig, DrawStyle, FrameRequest, TickToken,
    ToolKind,
};
use inkmark_render::DisplayList;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid script value: {0}")]
    Config(#[from] AnnotateError),
    #[error("{0}")]
    Usage(String),
}

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Run one tick of the render loop (or repaint when it is stopped).
    Frame,
    Tool { tool: String },
    /// `draw`, `eraser`, `clear` or `format` (keeps the current style).
    Action { action: String },
    Style { line_width: f64, color: String },
    Export {
        #[serde(default)]
        filename: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: AnnotatorConfig,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let script: Script = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Summary of one shape left in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSummary {
    pub kind: ToolKind,
    pub points: usize,
    pub style: DrawStyle,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub shapes: Vec<ShapeSummary>,
    pub committed: usize,
    pub erased: usize,
    pub frames: usize,
    pub commands: usize,
    /// Shapes painted in the last frame, the stroke in flight included.
    pub painted: usize,
    /// Filenames of exports that produced data.
    pub exports: Vec<String>,
}

/// `format` carries no style of its own, so it reapplies `current`.
fn parse_action(name: &str, current: DrawStyle) -> Result<Action, ReplayError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "draw" => Ok(Action::Draw),
        "eraser" | "erase" => Ok(Action::Eraser),
        "clear" => Ok(Action::Clear),
        "format" => Ok(Action::Format(current)),
        other => Err(ReplayError::Usage(format!("Unknown action: {other}"))),
    }
}

/// Feeds script events through an annotator drawing into a [`DisplayList`].
pub struct Replayer {
    annotator: Annotator<DisplayList>,
    token: Option<TickToken>,
    report: ReplayReport,
}

impl Replayer {
    pub fn new(config: AnnotatorConfig) -> Self {
        let mut annotator = Annotator::new(config);
        annotator.init(DisplayList::new());
        Self {
            annotator,
            token: None,
            report: ReplayReport::default(),
        }
    }

    pub fn annotator(&self) -> &Annotator<DisplayList> {
        &self.annotator
    }

    fn track(&mut self, request: FrameRequest) {
        match request {
            FrameRequest::Start(token) => self.token = Some(token),
            FrameRequest::Stop => self.token = None,
            FrameRequest::None => {}
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &ScriptEvent) -> Result<(), ReplayError> {
        let before = self.annotator.scene().len();
        match event {
            ScriptEvent::Down { x, y } => {
                let request = self.annotator.pointer_down(Point::new(*x, *y));
                self.track(request);
            }
            ScriptEvent::Move { x, y } => {
                let request = self.annotator.pointer_move(Point::new(*x, *y));
                self.track(request);
            }
            ScriptEvent::Up { x, y } => {
                let request = self.annotator.pointer_up(Point::new(*x, *y));
                self.track(request);
            }
            ScriptEvent::Frame => match self.token {
                Some(token) if self.annotator.tick(token) => {}
                _ => {
                    self.token = None;
                    self.annotator.render_frame();
                }
            },
            ScriptEvent::Tool { tool } => {
                let request = self.annotator.set_tool(tool.parse()?);
                self.track(request);
            }
            ScriptEvent::Action { action } => {
                let action = parse_action(action, self.annotator.style())?;
                let request = self.annotator.set_action(action);
                self.track(request);
            }
            ScriptEvent::Style { line_width, color } => {
                let style = DrawStyle::parse(*line_width, color)?;
                self.annotator.set_action(Action::Format(style));
            }
            ScriptEvent::Export { filename } => {
                match self.annotator.export_image(filename.as_deref()) {
                    Some(image) => {
                        log::info!("Exported {} ({} bytes)", image.filename, image.bytes.len());
                        self.report.exports.push(image.filename);
                    }
                    None => log::info!("Export produced no data"),
                }
            }
        }

        let after = self.annotator.scene().len();
        if after > before {
            self.report.committed += after - before;
            if let Some(shape) = self.annotator.scene().shapes().last() {
                log::info!(
                    "Committed {} with {} point(s)",
                    shape.kind.name(),
                    shape.points.len()
                );
            }
        } else if after < before {
            self.report.erased += before - after;
            log::info!("Removed {} shape(s)", before - after);
        }
        Ok(())
    }

    /// Finish the replay and summarize the scene.
    pub fn finish(mut self) -> ReplayReport {
        self.report.shapes = self
            .annotator
            .scene()
            .iter()
            .map(|shape| ShapeSummary {
                kind: shape.kind,
                points: shape.points.len(),
                style: shape.style,
            })
            .collect();
        if let Some(list) = self.annotator.surface() {
            self.report.frames = list.frame_count();
            self.report.commands = list.commands().len();
            self.report.painted = list.stroke_count();
        }
        self.report
    }
}

/// Run a whole script.
pub fn run(script: &Script) -> Result<ReplayReport, ReplayError> {
    let mut replayer = Replayer::new(script.config.clone());
    for (index, event) in script.events.iter().enumerate() {
        log::debug!("Event {}: {:?}", index, event);
        replayer.apply(event)?;
    }
    Ok(replayer.finish())
}
