// Closed Catmull-Rom spline through the track's control points.
//
// Parameter t ∈ [0, 1) covers the whole loop; t = k/N lands exactly on
// control point k. Neighbours are taken cyclically so the seam between the
// last and first anchor is as smooth as every other section.

use glam::Vec3;
use super::error::TrackError;

/// Minimum number of anchors for a closed curve.
pub const MIN_CONTROL_POINTS: usize = 3;

// ============================================================================
// PARAMETER WRAPPING
// ============================================================================

/// Wrap any real parameter into [0, 1). Negative values wrap from the end.
/// Non-finite input maps to 0.
pub fn wrap_unit(t: f32) -> f32 {
    if !t.is_finite() {
        return 0.0;
    }
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

// ============================================================================
// CATMULL-ROM BASIS
// ============================================================================

/// Uniform Catmull-Rom segment between p1 (t = 0) and p2 (t = 1).
/// p0 and p3 only shape the tangents.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

// ============================================================================
// CONTROL POINT VALIDATION
// ============================================================================

/// Turn authored anchor slots into a dense point list.
/// Count is checked before gaps, so two empty slots report the count first.
pub fn collect_control_points(anchors: &[Option<Vec3>]) -> Result<Vec<Vec3>, TrackError> {
    if anchors.len() < MIN_CONTROL_POINTS {
        return Err(TrackError::InsufficientControlPoints { found: anchors.len() });
    }
    anchors
        .iter()
        .enumerate()
        .map(|(index, p)| p.ok_or(TrackError::MissingControlPoint { index }))
        .collect()
}

// ============================================================================
// CLOSED SPLINE
// ============================================================================

/// Validated closed curve. Cheap to clone; holds only the anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSpline {
    points: Vec<Vec3>,
}

impl ClosedSpline {
    pub fn new(points: Vec<Vec3>) -> Result<Self, TrackError> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(TrackError::InsufficientControlPoints { found: points.len() });
        }
        Ok(Self { points })
    }

    pub fn from_anchors(anchors: &[Option<Vec3>]) -> Result<Self, TrackError> {
        Self::new(collect_control_points(anchors)?)
    }

    pub fn control_points(&self) -> &[Vec3] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }

    /// Point on the loop at parameter t (wrapped into [0, 1)).
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let scaled = wrap_unit(t) * n as f32;
        let i = (scaled.floor() as usize).min(n - 1);
        let local_t = scaled - i as f32;

        let p = |offset: usize| self.points[(i + offset) % n];
        catmull_rom(p(n - 1), p(0), p(1), p(2), local_t)
    }

    /// `count` points at evenly spaced parameters over [0, 1).
    /// The last sample is not a repeat of the first; the polyline is closed implicitly.
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| self.evaluate(i as f32 / count as f32))
            .collect()
    }
}

/// One-shot evaluation without keeping a `ClosedSpline` around.
pub fn evaluate(points: &[Vec3], t: f32) -> Result<Vec3, TrackError> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(TrackError::InsufficientControlPoints { found: points.len() });
    }
    let spline = ClosedSpline { points: points.to_vec() };
    Ok(spline.evaluate(t))
}
