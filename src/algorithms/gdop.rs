//! Geometry quality assessment for a computed fix
//!
//! None of this changes the solution. It tells the caller how much to trust
//! it: horizontal dilution of precision for range fixes, crossing angle for
//! bearing fixes, and per-anchor range residuals.

use crate::core::{Point2D, RangeMeasurement};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Anchors closer than this to the estimate contribute no direction
const MIN_DIRECTION_LENGTH: f64 = 1e-10;

/// Determinant of HᵀH below which the geometry is treated as singular
const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Coarse label for how well the anchors constrain the fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Degenerate,
}

impl GeometryQuality {
    /// Classify a DOP value against ascending `[excellent, good, acceptable]`
    /// upper bounds.
    pub fn from_dop(dop: f64, thresholds: &[f64; 3]) -> Self {
        if !dop.is_finite() {
            GeometryQuality::Degenerate
        } else if dop < thresholds[0] {
            GeometryQuality::Excellent
        } else if dop < thresholds[1] {
            GeometryQuality::Good
        } else if dop < thresholds[2] {
            GeometryQuality::Acceptable
        } else {
            GeometryQuality::Poor
        }
    }

    /// Classify the acute angle between two bearing lines, in degrees
    pub fn from_crossing_angle(angle_deg: f64) -> Self {
        if !angle_deg.is_finite() || angle_deg <= 0.0 {
            GeometryQuality::Degenerate
        } else if angle_deg >= 60.0 {
            GeometryQuality::Excellent
        } else if angle_deg >= 30.0 {
            GeometryQuality::Good
        } else if angle_deg >= 15.0 {
            GeometryQuality::Acceptable
        } else {
            GeometryQuality::Poor
        }
    }

    pub fn is_usable(&self) -> bool {
        *self <= GeometryQuality::Acceptable
    }
}

/// Horizontal dilution of precision at `estimate`.
///
/// Each anchor contributes the unit vector from the estimate towards it as a
/// row of H; HDOP is `sqrt(trace((HᵀH)⁻¹))`. Returns `None` when fewer than
/// two anchors give a direction or HᵀH is singular.
pub fn horizontal_dop(anchors: &[Point2D], estimate: &Point2D) -> Option<f64> {
    let origin = estimate.to_vector();
    let mut normal = Matrix2::<f64>::zeros();
    let mut rows = 0;

    for anchor in anchors {
        let diff: Vector2<f64> = anchor.to_vector() - origin;
        let distance = diff.norm();
        if distance > MIN_DIRECTION_LENGTH {
            let unit = diff / distance;
            normal += unit * unit.transpose();
            rows += 1;
        }
    }

    if rows < 2 || normal.determinant().abs() < SINGULAR_DETERMINANT {
        return None;
    }

    let covariance = normal.try_inverse()?;
    let trace = covariance.trace();
    (trace.is_finite() && trace >= 0.0).then(|| trace.sqrt())
}

/// Acute angle between two bearing lines, in `[0, 90]` degrees
pub fn crossing_angle_deg(theta1_deg: f64, theta2_deg: f64) -> f64 {
    let diff = (theta2_deg - theta1_deg).rem_euclid(180.0);
    diff.min(180.0 - diff)
}

/// `|estimate - anchor| - range` for every measurement.
///
/// All zero for consistent measurements. Large values mean the range
/// circles did not share a common point and the linearized solve landed
/// somewhere none of them agree on.
pub fn range_residuals(measurements: &[RangeMeasurement], estimate: &Point2D) -> Vec<f64> {
    measurements
        .iter()
        .map(|m| m.anchor.position.distance_to(estimate) - m.range)
        .collect()
}

/// Root mean square, zero for an empty slice
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Anchor;
    use approx::assert_abs_diff_eq;

    const THRESHOLDS: [f64; 3] = [2.0, 5.0, 10.0];

    #[test]
    fn test_quality_from_dop() {
        assert_eq!(GeometryQuality::from_dop(1.2, &THRESHOLDS), GeometryQuality::Excellent);
        assert_eq!(GeometryQuality::from_dop(3.0, &THRESHOLDS), GeometryQuality::Good);
        assert_eq!(GeometryQuality::from_dop(7.0, &THRESHOLDS), GeometryQuality::Acceptable);
        assert_eq!(GeometryQuality::from_dop(42.0, &THRESHOLDS), GeometryQuality::Poor);
        assert_eq!(GeometryQuality::from_dop(f64::INFINITY, &THRESHOLDS), GeometryQuality::Degenerate);
        assert!(GeometryQuality::Good.is_usable());
        assert!(!GeometryQuality::Poor.is_usable());
    }

    #[test]
    fn test_hdop_orthogonal_pair() {
        // Two orthogonal unit rows give HᵀH = I, so HDOP = sqrt(2).
        let estimate = Point2D::origin();
        let anchors = [Point2D::new(5.0, 0.0), Point2D::new(0.0, 3.0)];
        let hdop = horizontal_dop(&anchors, &estimate).unwrap();
        assert_abs_diff_eq!(hdop, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_spread_geometry_beats_skinny_geometry() {
        let estimate = Point2D::new(0.0, 0.0);
        let spread = [
            Point2D::new(10.0, 0.0),
            Point2D::new(-5.0, 8.66),
            Point2D::new(-5.0, -8.66),
        ];
        let skinny = [
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 1.0),
            Point2D::new(10.0, -1.0),
        ];
        let good = horizontal_dop(&spread, &estimate).unwrap();
        let bad = horizontal_dop(&skinny, &estimate).unwrap();
        assert!(good < bad);
        assert_eq!(GeometryQuality::from_dop(good, &THRESHOLDS), GeometryQuality::Excellent);
    }

    #[test]
    fn test_hdop_singular_when_all_anchors_in_one_direction() {
        let estimate = Point2D::origin();
        let anchors = [Point2D::new(1.0, 0.0), Point2D::new(2.0, 0.0), Point2D::new(-3.0, 0.0)];
        assert!(horizontal_dop(&anchors, &estimate).is_none());
    }

    #[test]
    fn test_hdop_skips_anchor_at_estimate() {
        let estimate = Point2D::new(1.0, 1.0);
        let anchors = [Point2D::new(1.0, 1.0), Point2D::new(4.0, 1.0)];
        assert!(horizontal_dop(&anchors, &estimate).is_none());
    }

    #[test]
    fn test_crossing_angle() {
        assert_abs_diff_eq!(crossing_angle_deg(45.0, 135.0), 90.0);
        assert_abs_diff_eq!(crossing_angle_deg(10.0, 200.0), 10.0);
        assert_abs_diff_eq!(crossing_angle_deg(350.0, 10.0), 20.0);
        assert_eq!(GeometryQuality::from_crossing_angle(90.0), GeometryQuality::Excellent);
        assert_eq!(GeometryQuality::from_crossing_angle(5.0), GeometryQuality::Poor);
        assert_eq!(GeometryQuality::from_crossing_angle(0.0), GeometryQuality::Degenerate);
    }

    #[test]
    fn test_residuals() {
        let estimate = Point2D::new(3.0, 4.0);
        let ms = [
            RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 5.0),
            RangeMeasurement::new(Anchor::new(2, 10.0, 0.0), 7.0),
        ];
        let residuals = range_residuals(&ms, &estimate);
        assert_abs_diff_eq!(residuals[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(residuals[1], 65.0_f64.sqrt() - 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rms(&[3.0, 4.0]), 12.5_f64.sqrt());
        assert_eq!(rms(&[]), 0.0);
    }
}
