//! Inkmark Render Library
//!
//! Drawing backends for the annotation core. [`DisplayList`] records draw
//! calls and is always available; the Vello backend builds GPU scenes.

mod display_list;
mod export;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use display_list::{DisplayList, DrawCommand};
pub use export::{RasterReadback, RenderResult, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
