//! Degeneracy guards shared by the solvers
//!
//! Both guards can also be called on their own to pre-validate an anchor
//! placement before any measurement exists.

use crate::core::{Point2D, COLLINEARITY_TOLERANCE, PARALLEL_TOLERANCE};
use nalgebra::Vector2;

/// Twice the signed area of the triangle `p1 p2 p3`.
///
/// Positive for counter-clockwise order. The trilateration denominator is
/// exactly four times this value.
pub fn twice_signed_area(p1: &Point2D, p2: &Point2D, p3: &Point2D) -> f64 {
    (p2.x() - p1.x()) * (p3.y() - p1.y()) - (p2.y() - p1.y()) * (p3.x() - p1.x())
}

/// 2-D cross product (z component of the 3-D cross)
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unit direction of a bearing given in degrees
pub fn bearing_direction(theta_deg: f64) -> Vector2<f64> {
    let (sin, cos) = theta_deg.to_radians().sin_cos();
    Vector2::new(cos, sin)
}

/// Detects anchor triples that cannot be trilaterated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollinearityGuard {
    pub tolerance: f64,
}

impl Default for CollinearityGuard {
    fn default() -> Self {
        Self {
            tolerance: COLLINEARITY_TOLERANCE,
        }
    }
}

impl CollinearityGuard {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// True when `|twice_signed_area|` is below the tolerance. Duplicated
    /// anchors have zero area and are caught here too.
    pub fn is_collinear(&self, p1: &Point2D, p2: &Point2D, p3: &Point2D) -> bool {
        twice_signed_area(p1, p2, p3).abs() < self.tolerance
    }
}

/// Detects bearing pairs whose rays never cross
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelGuard {
    pub tolerance: f64,
}

impl Default for ParallelGuard {
    fn default() -> Self {
        Self {
            tolerance: PARALLEL_TOLERANCE,
        }
    }
}

impl ParallelGuard {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Cross product of the two unit directions, i.e. `sin(theta2 - theta1)`.
    pub fn crossing(&self, theta1_deg: f64, theta2_deg: f64) -> f64 {
        cross(&bearing_direction(theta1_deg), &bearing_direction(theta2_deg))
    }

    /// True when the rays are parallel within tolerance.
    ///
    /// Works on direction vectors, so 90° and 270° need no special case.
    /// Equal and opposite bearings are both parallel.
    pub fn is_parallel(&self, theta1_deg: f64, theta2_deg: f64) -> bool {
        self.rejects_crossing(self.crossing(theta1_deg, theta2_deg))
    }

    /// Same test on an already computed [`ParallelGuard::crossing`] value
    pub fn rejects_crossing(&self, crossing: f64) -> bool {
        crossing.abs() < self.tolerance
    }
}
