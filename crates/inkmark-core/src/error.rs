//! Error types for the annotation core.

use thiserror::Error;

/// Errors raised while building styles or configuration.
///
/// Geometry and hit-testing never fail; only host-supplied values are
/// validated.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Line width must be a positive finite number, got {0}")]
    InvalidLineWidth(f64),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for annotation operations.
pub type AnnotateResult<T> = Result<T, AnnotateError>;
