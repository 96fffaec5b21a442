//! Inkmark Application
//!
//! Host shells for the annotation core: a browser host on WASM and a
//! pointer-event script replayer on native targets.

#[cfg(not(target_arch = "wasm32"))]
pub mod replay;

#[cfg(not(target_arch = "wasm32"))]
pub use replay::{ReplayError, ReplayReport, Replayer, Script, ScriptEvent, ShapeSummary};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{Canvas2dSurface, ExportedPng, WebAnnotator, run_wasm};
