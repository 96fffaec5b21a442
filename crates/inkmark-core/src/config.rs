//! Annotator configuration.

use crate::error::{AnnotateError, AnnotateResult};
use crate::geometry::MOVE_TOLERANCE;
use crate::shapes::{DrawStyle, SerializableColor};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// Smallest accepted curve sampling step; caps a segment at 1001 samples.
pub const MIN_CURVE_SAMPLE_STEP: f64 = 1e-3;

/// Tunables for hit-testing and curve sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Base tolerance in pixels (also used for pointer sample dedup).
    pub tolerance: f64,
    /// Multiplier applied to `tolerance` when testing sampled curve points.
    pub curve_tolerance_factor: f64,
    /// Parameter step used when sampling each cubic segment.
    pub curve_sample_step: f64,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            tolerance: MOVE_TOLERANCE,
            curve_tolerance_factor: 4.0,
            curve_sample_step: 0.05,
        }
    }
}

impl HitConfig {
    /// Tolerance used for sampled curve points.
    pub fn curve_tolerance(&self) -> f64 {
        self.tolerance * self.curve_tolerance_factor
    }

    /// Number of samples taken per curve segment, endpoints included.
    pub fn curve_samples(&self) -> usize {
        let step = self.curve_sample_step.max(MIN_CURVE_SAMPLE_STEP).min(1.0);
        (1.0 / step).round() as usize + 1
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> AnnotateResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnnotateError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.curve_tolerance_factor.is_finite() && self.curve_tolerance_factor > 0.0) {
            return Err(AnnotateError::InvalidConfig(format!(
                "curve_tolerance_factor must be positive, got {}",
                self.curve_tolerance_factor
            )));
        }
        if !(self.curve_sample_step >= MIN_CURVE_SAMPLE_STEP && self.curve_sample_step <= 1.0) {
            return Err(AnnotateError::InvalidConfig(format!(
                "curve_sample_step must be in [{}, 1], got {}",
                MIN_CURVE_SAMPLE_STEP, self.curve_sample_step
            )));
        }
        Ok(())
    }
}

/// Configuration for an [`Annotator`](crate::Annotator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Color painted behind every frame.
    pub background: SerializableColor,
    /// Style applied to strokes until the host changes it.
    pub initial_style: DrawStyle,
    /// Tool selected at start.
    pub initial_tool: ToolKind,
    /// Hit-testing tunables.
    pub hit: HitConfig,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: SerializableColor::white(),
            initial_style: DrawStyle::default(),
            initial_tool: ToolKind::default(),
            hit: HitConfig::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Create a configuration for a surface of the given size.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> AnnotateResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> AnnotateResult<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(AnnotateError::InvalidConfig(format!(
                "surface size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        DrawStyle::new(self.initial_style.line_width, self.initial_style.color)?;
        self.hit.validate()
    }
}
