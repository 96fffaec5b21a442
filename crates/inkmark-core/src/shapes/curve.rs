//! Smoothed freehand curves.
//!
//! Raw pointer samples are turned into a chain of cubic Béziers that does not
//! interpolate the samples: segment `k` starts where segment `k - 1` ended
//! (the first starts at sample 0), uses samples `3k + 1` and `3k + 2` as
//! control points, and ends halfway between sample `3k + 2` and sample
//! `3k + 4`. Whatever follows the last full window is drawn as straight lines
//! through the remaining samples, so the stroke always finishes on the last
//! sample.
//!
//! Hit-testing and painting both go through [`CurveChain`] so they agree on
//! where the curve is.

use super::segment;
use crate::config::HitConfig;
use crate::geometry::{midpoint, point_near};
use kurbo::{BezPath, CubicBez, Line, ParamCurve, Point};

/// A stroke decomposed into cubic segments followed by a straight tail.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveChain {
    /// First sample, or `None` for an empty stroke.
    pub origin: Option<Point>,
    /// Cubic segments, each starting at the previous one's end.
    pub segments: Vec<CubicBez>,
    /// Samples joined by straight lines after the last cubic segment.
    pub tail: Vec<Point>,
}

impl CurveChain {
    /// Fit a chain to raw samples.
    pub fn from_points(points: &[Point]) -> Self {
        let Some(&origin) = points.first() else {
            return Self {
                origin: None,
                segments: Vec::new(),
                tail: Vec::new(),
            };
        };

        let mut segments = Vec::new();
        let mut cursor = origin;
        let mut base = 0;
        while base + 4 < points.len() {
            let end = midpoint(points[base + 2], points[base + 4]);
            segments.push(CubicBez::new(cursor, points[base + 1], points[base + 2], end));
            cursor = end;
            base += 3;
        }

        Self {
            origin: Some(origin),
            segments,
            tail: points[base + 1..].to_vec(),
        }
    }

    /// Whether the chain contains at least one curved segment.
    pub fn is_curved(&self) -> bool {
        !self.segments.is_empty()
    }

    /// End point of the curved part (the origin when there is none).
    pub fn curve_end(&self) -> Option<Point> {
        self.segments.last().map(|seg| seg.p3).or(self.origin)
    }

    /// Straight lines making up the tail.
    pub fn tail_lines(&self) -> impl Iterator<Item = Line> + '_ {
        let start = self.curve_end();
        start
            .into_iter()
            .chain(self.tail.iter().copied())
            .zip(self.tail.iter().copied())
            .map(|(a, b)| Line::new(a, b))
    }

    /// Sample every segment and tail line at `samples` evenly spaced
    /// parameters, endpoints included.
    pub fn sample(&self, samples: usize) -> impl Iterator<Item = Point> + '_ {
        let params = sample_params(samples);
        let curves = self
            .segments
            .iter()
            .flat_map(move |seg| params.clone().map(move |t| seg.eval(t)));
        let params = sample_params(samples);
        let lines = self
            .tail_lines()
            .flat_map(move |line| params.clone().map(move |t| line.eval(t)));
        curves.chain(lines)
    }

    /// Path for rendering: move to the origin, curve through each segment,
    /// then line to each tail sample.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(origin) = self.origin else {
            return path;
        };

        path.move_to(origin);
        for seg in &self.segments {
            path.curve_to(seg.p1, seg.p2, seg.p3);
        }
        for p in &self.tail {
            path.line_to(*p);
        }
        path
    }
}

/// Evenly spaced parameters in `[0, 1]`, endpoints included.
fn sample_params(samples: usize) -> impl Iterator<Item = f64> + Clone {
    let last = samples.saturating_sub(1).max(1);
    (0..samples).map(move |i| (i as f64 / last as f64).min(1.0))
}

/// Check whether `target` is near a curve stroke.
///
/// Short strokes fall back to simpler tests: nothing hits an empty stroke,
/// a single sample is a point test, and strokes too short to form a cubic
/// segment are tested as straight segments between consecutive samples.
pub fn hit_test(points: &[Point], target: Point, config: &HitConfig) -> bool {
    match points {
        [] => false,
        [p] => point_near(*p, target, config.tolerance),
        _ => {
            let chain = CurveChain::from_points(points);
            if !chain.is_curved() {
                return points
                    .windows(2)
                    .any(|pair| segment::hit_test(pair, target, config.tolerance));
            }
            let tolerance = config.curve_tolerance();
            chain
                .sample(config.curve_samples())
                .any(|p| point_near(p, target, tolerance))
        }
    }
}
