//! Inkmark Core Library
//!
//! Platform-agnostic geometry, hit-testing and interaction logic for the
//! Inkmark annotation layer.

pub mod annotator;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render_loop;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod tools;

pub use annotator::{Annotator, InteractionState, Mode};
pub use config::{AnnotatorConfig, HitConfig, MIN_CURVE_SAMPLE_STEP};
pub use error::{AnnotateError, AnnotateResult};
pub use geometry::MOVE_TOLERANCE;
pub use render_loop::{FrameRequest, RenderLoop, TickToken};
pub use scene::Scene;
pub use shapes::{DrawStyle, SerializableColor, Shape};
pub use surface::{DrawSurface, ExportedImage};
pub use tools::{Action, ActiveDraw, ToolKind};
