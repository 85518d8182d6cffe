//! Closed-form trilateration from three ranges
//!
//! Subtracting the circle equation of the first anchor from the other two
//! leaves a 2x2 linear system
//!
//! ```text
//! A x + B y = C      A = 2(x2-x1), B = 2(y2-y1), C = d1²-d2²-x1²+x2²-y1²+y2²
//! D x + E y = F      D = 2(x3-x1), E = 2(y3-y1), F = d1²-d3²-x1²+x3²-y1²+y3²
//! ```
//!
//! which is solved with Cramer's rule. The solve is exact for consistent
//! measurements. When the three circles share no common point the result is
//! still the unique point satisfying both linearized equations; it is not a
//! least-squares fit and no attempt is made to detect or correct that case
//! here (see `algorithms::gdop::range_residuals` for a diagnostic).

use crate::core::{Point2D, RangeMeasurement};
use crate::validation::error::{LocalizationError, LocalizationResult};
use crate::validation::guards::{twice_signed_area, CollinearityGuard};
use crate::validation::validate_range;
use log::{debug, warn};

/// Exact three-anchor range solver
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeSolver {
    guard: CollinearityGuard,
}

impl RangeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with a custom collinearity tolerance (twice-signed area)
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            guard: CollinearityGuard::new(tolerance),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.guard.tolerance
    }

    /// Solve for the point at distance `d_i` from each anchor `p_i`.
    ///
    /// The order of the three measurements does not matter.
    pub fn solve(
        &self,
        m1: &RangeMeasurement,
        m2: &RangeMeasurement,
        m3: &RangeMeasurement,
    ) -> LocalizationResult<Point2D> {
        validate_range(m1)?;
        validate_range(m2)?;
        validate_range(m3)?;

        let (p1, p2, p3) = (m1.anchor.position, m2.anchor.position, m3.anchor.position);

        if self.guard.is_collinear(&p1, &p2, &p3) {
            let twice_area = twice_signed_area(&p1, &p2, &p3);
            warn!(
                "anchors {}, {}, {} are collinear (twice area {:.3e}), refusing to trilaterate",
                m1.anchor.id, m2.anchor.id, m3.anchor.id, twice_area
            );
            return Err(LocalizationError::CollinearAnchors {
                anchors: [m1.anchor.id, m2.anchor.id, m3.anchor.id],
                twice_area,
            });
        }

        let (x1, y1, d1) = (p1.x(), p1.y(), m1.range);
        let (x2, y2, d2) = (p2.x(), p2.y(), m2.range);
        let (x3, y3, d3) = (p3.x(), p3.y(), m3.range);

        let a = 2.0 * (x2 - x1);
        let b = 2.0 * (y2 - y1);
        let c = d1.powi(2) - d2.powi(2) - x1.powi(2) + x2.powi(2) - y1.powi(2) + y2.powi(2);
        let d = 2.0 * (x3 - x1);
        let e = 2.0 * (y3 - y1);
        let f = d1.powi(2) - d3.powi(2) - x1.powi(2) + x3.powi(2) - y1.powi(2) + y3.powi(2);

        let denominator = a * e - b * d;
        let x = (c * e - b * f) / denominator;
        let y = (a * f - c * d) / denominator;

        let solution = Point2D::new(x, y);
        if !solution.is_finite() {
            warn!("trilateration overflowed: ({}, {})", x, y);
            return Err(LocalizationError::NonFiniteSolution { x, y });
        }

        debug!(
            "trilaterated {} from {}={:.3}, {}={:.3}, {}={:.3}",
            solution, m1.anchor.id, d1, m2.anchor.id, d2, m3.anchor.id, d3
        );
        Ok(solution)
    }

    /// Convenience over an array of exactly three measurements
    pub fn solve_array(&self, measurements: &[RangeMeasurement; 3]) -> LocalizationResult<Point2D> {
        let [m1, m2, m3] = measurements;
        self.solve(m1, m2, m3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Anchor, AnchorId};
    use crate::validation::MeasurementIssue;
    use approx::assert_abs_diff_eq;

    fn ranged(anchor: Anchor, target: Point2D) -> RangeMeasurement {
        RangeMeasurement::new(anchor, anchor.position.distance_to(&target))
    }

    #[test]
    fn test_right_triangle_scenario() {
        let solver = RangeSolver::new();
        let m1 = RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 5.0);
        let m2 = RangeMeasurement::new(Anchor::new(2, 10.0, 0.0), 65.0_f64.sqrt());
        let m3 = RangeMeasurement::new(Anchor::new(3, 0.0, 10.0), 45.0_f64.sqrt());

        let p = solver.solve(&m1, &m2, &m3).unwrap();
        assert_abs_diff_eq!(p.x(), 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_order_of_measurements_does_not_matter() {
        let solver = RangeSolver::new();
        let target = Point2D::new(-2.5, 7.25);
        let ms = [
            ranged(Anchor::new(1, 6.0, 7.5), target),
            ranged(Anchor::new(2, 9.0, -3.0), target),
            ranged(Anchor::new(3, 5.0, 7.5 + 4.0), target),
        ];
        let orders = [[0, 1, 2], [2, 0, 1], [1, 2, 0], [2, 1, 0]];
        for order in orders {
            let p = solver
                .solve(&ms[order[0]], &ms[order[1]], &ms[order[2]])
                .unwrap();
            assert_abs_diff_eq!(p.x(), target.x(), epsilon = 1e-6);
            assert_abs_diff_eq!(p.y(), target.y(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_over_grid() {
        let solver = RangeSolver::new();
        let layouts = [
            [Anchor::new(1, 0.0, 0.0), Anchor::new(2, 10.0, 0.0), Anchor::new(3, 0.0, 10.0)],
            [Anchor::new(1, 6.0, 7.5), Anchor::new(2, 9.0, -3.0), Anchor::new(3, 5.0, 7.5)],
            [Anchor::new(1, -20.0, -20.0), Anchor::new(2, 20.0, -15.0), Anchor::new(3, 3.0, 18.0)],
        ];

        for anchors in layouts.iter() {
            for ix in -4..=4 {
                for iy in -4..=4 {
                    let target = Point2D::new(ix as f64 * 4.5, iy as f64 * 3.25);
                    let ms = anchors.map(|a| ranged(a, target));
                    let p = solver.solve_array(&ms).unwrap();
                    assert_abs_diff_eq!(p.x(), target.x(), epsilon = 1e-6);
                    assert_abs_diff_eq!(p.y(), target.y(), epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_target_on_an_anchor() {
        let solver = RangeSolver::new();
        let target = Point2D::new(10.0, 0.0);
        let ms = [
            ranged(Anchor::new(1, 0.0, 0.0), target),
            ranged(Anchor::new(2, 10.0, 0.0), target),
            ranged(Anchor::new(3, 0.0, 10.0), target),
        ];
        assert_eq!(ms[1].range, 0.0);
        let p = solver.solve_array(&ms).unwrap();
        assert_abs_diff_eq!(p.x(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_anchors_rejected() {
        let solver = RangeSolver::new();
        let result = solver.solve(
            &RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 3.0),
            &RangeMeasurement::new(Anchor::new(2, 5.0, 0.0), 4.0),
            &RangeMeasurement::new(Anchor::new(3, 10.0, 0.0), 5.0),
        );
        match result {
            Err(LocalizationError::CollinearAnchors { anchors, twice_area }) => {
                assert_eq!(anchors, [AnchorId(1), AnchorId(2), AnchorId(3)]);
                assert_eq!(twice_area, 0.0);
            }
            other => panic!("expected CollinearAnchors, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicated_anchor_rejected() {
        let solver = RangeSolver::new();
        let result = solver.solve(
            &RangeMeasurement::new(Anchor::new(1, 2.0, 3.0), 1.0),
            &RangeMeasurement::new(Anchor::new(2, 2.0, 3.0), 1.0),
            &RangeMeasurement::new(Anchor::new(3, 7.0, -1.0), 5.0),
        );
        assert!(matches!(result, Err(LocalizationError::CollinearAnchors { .. })));
    }

    #[test]
    fn test_near_collinear_respects_tolerance() {
        let m1 = RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 5.0);
        let m2 = RangeMeasurement::new(Anchor::new(2, 10.0, 0.0), 5.0);
        let m3 = RangeMeasurement::new(Anchor::new(3, 20.0, 1e-4), 15.0);

        // twice area is 1e-3
        assert!(RangeSolver::with_tolerance(1e-2).solve(&m1, &m2, &m3).is_err());
        assert!(RangeSolver::new().solve(&m1, &m2, &m3).is_ok());
    }

    #[test]
    fn test_any_distances_on_collinear_layout_fail() {
        let solver = RangeSolver::new();
        for d in [0.0, 1.0, 7.5, 100.0] {
            let result = solver.solve(
                &RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), d),
                &RangeMeasurement::new(Anchor::new(2, 5.0, 0.0), d * 0.5),
                &RangeMeasurement::new(Anchor::new(3, 10.0, 0.0), d * 2.0),
            );
            assert!(result.unwrap_err().is_geometry_failure());
        }
    }

    #[test]
    fn test_inconsistent_ranges_still_return_linearized_point() {
        // Circles of radius 1 around (0,0), (10,0), (0,10) share no point.
        let solver = RangeSolver::new();
        let p = solver
            .solve(
                &RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 1.0),
                &RangeMeasurement::new(Anchor::new(2, 10.0, 0.0), 1.0),
                &RangeMeasurement::new(Anchor::new(3, 0.0, 10.0), 1.0),
            )
            .unwrap();
        // Radical lines: x = 5 and y = 5.
        assert_abs_diff_eq!(p.x(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_distance_rejected() {
        let solver = RangeSolver::new();
        let result = solver.solve(
            &RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 5.0),
            &RangeMeasurement::new(Anchor::new(2, 10.0, 0.0), -2.0),
            &RangeMeasurement::new(Anchor::new(3, 0.0, 10.0), 5.0),
        );
        match result {
            Err(LocalizationError::InvalidMeasurement { anchor, issue, .. }) => {
                assert_eq!(anchor, AnchorId(2));
                assert_eq!(issue, MeasurementIssue::NegativeRange);
            }
            other => panic!("expected InvalidMeasurement, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_reported_as_non_finite() {
        let solver = RangeSolver::new();
        let result = solver.solve(
            &RangeMeasurement::new(Anchor::new(1, 0.0, 0.0), 1e200),
            &RangeMeasurement::new(Anchor::new(2, 1.0, 0.0), 1.0),
            &RangeMeasurement::new(Anchor::new(3, 0.0, 1.0), 1.0),
        );
        assert!(matches!(result, Err(LocalizationError::NonFiniteSolution { .. })));
    }
}
