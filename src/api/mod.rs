//! Caller-facing API
//!
//! The free functions here are the stateless entry points: each call takes a
//! full snapshot of the anchors it needs and returns a position or a typed
//! failure. [`Localizer`] adds configured tolerances and fix diagnostics on
//! top of them.

pub mod types;
pub mod localizer;
pub mod formatting;

pub use types::{LocalizationFix, LocalizationMode, LocalizationRequest};
pub use localizer::Localizer;
pub use formatting::{CsvFormatter, FixFormatter, JsonFormatter, OutputFormat, TextFormatter};
pub use crate::algorithms::select_closest;

use crate::algorithms::{BearingSolver, RangeSolver};
use crate::core::{Anchor, BearingMeasurement, Point2D, RangeMeasurement};
use crate::validation::LocalizationResult;

/// Trilaterate from three anchors and their distances with default tolerances
pub fn range_solve(
    anchor1: Anchor,
    d1: f64,
    anchor2: Anchor,
    d2: f64,
    anchor3: Anchor,
    d3: f64,
) -> LocalizationResult<Point2D> {
    RangeSolver::new().solve(
        &RangeMeasurement::new(anchor1, d1),
        &RangeMeasurement::new(anchor2, d2),
        &RangeMeasurement::new(anchor3, d3),
    )
}

/// Intersect two bearings, in degrees counter-clockwise from +x, with the
/// default tolerance
pub fn bearing_solve(
    anchor1: Anchor,
    theta1_deg: f64,
    anchor2: Anchor,
    theta2_deg: f64,
) -> LocalizationResult<Point2D> {
    BearingSolver::new().solve(
        &BearingMeasurement::new(anchor1, theta1_deg),
        &BearingMeasurement::new(anchor2, theta2_deg),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnchorId;
    use crate::validation::LocalizationError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_range_solve() {
        let p = range_solve(
            Anchor::new(1, 0.0, 0.0),
            5.0,
            Anchor::new(2, 10.0, 0.0),
            65f64.sqrt(),
            Anchor::new(3, 0.0, 10.0),
            45f64.sqrt(),
        )
        .unwrap();
        assert_abs_diff_eq!(p.x(), 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_range_solve_collinear() {
        let err = range_solve(
            Anchor::new(1, 0.0, 0.0),
            1.0,
            Anchor::new(2, 5.0, 0.0),
            1.0,
            Anchor::new(3, 10.0, 0.0),
            1.0,
        )
        .unwrap_err();
        assert!(err.is_geometry_failure());
    }

    #[test]
    fn test_bearing_solve() {
        let p = bearing_solve(Anchor::new(1, 0.0, 0.0), 45.0, Anchor::new(2, 10.0, 0.0), 135.0).unwrap();
        assert_abs_diff_eq!(p.x(), 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y(), 5.0, epsilon = 1e-6);

        let err = bearing_solve(Anchor::new(1, 0.0, 0.0), 30.0, Anchor::new(2, 0.0, 5.0), 30.0).unwrap_err();
        assert!(matches!(err, LocalizationError::ParallelBearings { .. }));
    }

    #[test]
    fn test_select_closest_reexport() {
        let ms: Vec<RangeMeasurement> = [9.0, 3.0, 7.0, 2.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| RangeMeasurement::new(Anchor::new(i as u32, i as f64, 0.0), r))
            .collect();
        let picked = select_closest(&ms).unwrap();
        let ids: Vec<AnchorId> = picked.iter().map(|m| m.anchor.id).collect();
        assert_eq!(ids, vec![AnchorId(3), AnchorId(1), AnchorId(4)]);
    }
}
