//! Closed-form angulation from two bearings
//!
//! Each bearing is the line `p_i + t * u_i` with `u_i = (cos θ_i, sin θ_i)`.
//! Intersecting the two lines is a 2x2 system in `t1, t2`; by Cramer's rule
//!
//! ```text
//! t1 = cross(p2 - p1, u2) / cross(u1, u2)
//! ```
//!
//! Using direction vectors instead of slopes keeps vertical bearings (90°,
//! 270°) exact. Away from vertical the result is identical to intersecting
//! `y = tan(θ1)(x - x1) + y1` with `y = tan(θ2)(x - x2) + y2`.

use crate::core::{BearingMeasurement, Point2D};
use crate::validation::error::{LocalizationError, LocalizationResult};
use crate::validation::guards::{bearing_direction, cross, ParallelGuard};
use crate::validation::validate_bearing;
use log::{debug, warn};

/// Exact two-anchor bearing solver
#[derive(Debug, Clone, Copy, Default)]
pub struct BearingSolver {
    guard: ParallelGuard,
}

/// Intersection point plus the signed distances along each ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    pub point: Point2D,
    /// Distance from the first anchor along its bearing; negative when the
    /// lines cross behind the anchor
    pub t1: f64,
    pub t2: f64,
}

impl RayIntersection {
    /// Both anchors see the point in front of them
    pub fn is_ahead_of_both(&self) -> bool {
        self.t1 >= 0.0 && self.t2 >= 0.0
    }
}

impl BearingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with a custom parallel tolerance (on `|sin(θ2 - θ1)|`)
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            guard: ParallelGuard::new(tolerance),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.guard.tolerance
    }

    /// Intersect the two bearing lines.
    pub fn solve(
        &self,
        m1: &BearingMeasurement,
        m2: &BearingMeasurement,
    ) -> LocalizationResult<Point2D> {
        self.intersect(m1, m2).map(|hit| hit.point)
    }

    /// Same as [`BearingSolver::solve`] but also reports where along each
    /// ray the intersection sits.
    pub fn intersect(
        &self,
        m1: &BearingMeasurement,
        m2: &BearingMeasurement,
    ) -> LocalizationResult<RayIntersection> {
        validate_bearing(m1)?;
        validate_bearing(m2)?;

        let denominator = self.guard.crossing(m1.bearing_deg, m2.bearing_deg);
        if self.guard.rejects_crossing(denominator) {
            warn!(
                "bearings {}°@{} and {}°@{} are parallel, no intersection",
                m1.bearing_deg, m1.anchor.id, m2.bearing_deg, m2.anchor.id
            );
            return Err(LocalizationError::ParallelBearings {
                anchors: [m1.anchor.id, m2.anchor.id],
                theta1_deg: m1.bearing_deg,
                theta2_deg: m2.bearing_deg,
            });
        }

        let u1 = bearing_direction(m1.bearing_deg);
        let u2 = bearing_direction(m2.bearing_deg);
        let p1 = m1.anchor.position.to_vector();
        let delta = m2.anchor.position.to_vector() - p1;
        let t1 = cross(&delta, &u2) / denominator;
        let t2 = cross(&delta, &u1) / denominator;
        let hit = p1 + u1 * t1;

        let point = Point2D::new(hit.x, hit.y);
        if !point.is_finite() {
            warn!("angulation overflowed: ({}, {})", hit.x, hit.y);
            return Err(LocalizationError::NonFiniteSolution { x: hit.x, y: hit.y });
        }

        let intersection = RayIntersection { point, t1, t2 };
        if !intersection.is_ahead_of_both() {
            debug!(
                "bearing lines cross behind an anchor (t1={:.3}, t2={:.3})",
                t1, t2
            );
        }
        debug!(
            "angulated {} from {}°@{} and {}°@{}",
            point, m1.bearing_deg, m1.anchor.id, m2.bearing_deg, m2.anchor.id
        );
        Ok(intersection)
    }
}
