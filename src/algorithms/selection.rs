//! Closest-anchor selection for over-determined range sets
//!
//! Anchors nearest to the target usually carry the smallest relative ranging
//! error, so with more than three anchors available only the three smallest
//! ranges are handed to the trilateration solver. This is a sort-and-truncate
//! heuristic, not a fusion of all N measurements.

use crate::core::{RangeMeasurement, RANGE_ANCHORS};
use crate::validation::error::{LocalizationError, LocalizationResult};
use crate::validation::validate_ranges;
use log::debug;
use std::cmp::Ordering;

/// Picks the anchors with the smallest reported ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSelector {
    count: usize,
}

impl Default for AnchorSelector {
    fn default() -> Self {
        Self {
            count: RANGE_ANCHORS,
        }
    }
}

impl AnchorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector keeping `count` anchors instead of three
    pub fn with_count(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Indices into `measurements` of the selected entries, ascending by
    /// range. Equal ranges keep their input order.
    pub fn select_indices(&self, measurements: &[RangeMeasurement]) -> LocalizationResult<Vec<usize>> {
        if measurements.len() < self.count {
            return Err(LocalizationError::InsufficientAnchors {
                available: measurements.len(),
                required: self.count,
            });
        }
        validate_ranges(measurements)?;

        let mut order: Vec<usize> = (0..measurements.len()).collect();
        // stable: ties stay in index order. Ranges are finite here, and
        // -0.0 must tie with 0.0.
        order.sort_by(|&a, &b| {
            measurements[a]
                .range
                .partial_cmp(&measurements[b].range)
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(self.count);

        debug!(
            "selected {} of {} anchors: {:?}",
            self.count,
            measurements.len(),
            order
                .iter()
                .map(|&i| measurements[i].anchor.id)
                .collect::<Vec<_>>()
        );
        Ok(order)
    }

    /// Selected measurements, ascending by range
    pub fn select(&self, measurements: &[RangeMeasurement]) -> LocalizationResult<Vec<RangeMeasurement>> {
        Ok(self
            .select_indices(measurements)?
            .into_iter()
            .map(|i| measurements[i])
            .collect())
    }
}

/// The `k` measurements with the smallest ranges
pub fn select_k_closest(
    measurements: &[RangeMeasurement],
    k: usize,
) -> LocalizationResult<Vec<RangeMeasurement>> {
    AnchorSelector::with_count(k).select(measurements)
}

/// The three measurements with the smallest ranges, ready for the range solver
pub fn select_closest(measurements: &[RangeMeasurement]) -> LocalizationResult<[RangeMeasurement; 3]> {
    let indices = AnchorSelector::new().select_indices(measurements)?;
    Ok([
        measurements[indices[0]],
        measurements[indices[1]],
        measurements[indices[2]],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Anchor, AnchorId};

    fn with_ranges(ranges: &[f64]) -> Vec<RangeMeasurement> {
        ranges
            .iter()
            .enumerate()
            .map(|(i, &r)| RangeMeasurement::new(Anchor::new(i as u32, i as f64, (i * i) as f64), r))
            .collect()
    }

    #[test]
    fn test_five_anchor_scenario() {
        let ms = with_ranges(&[9.0, 3.0, 7.0, 2.0, 5.0]);
        let indices = AnchorSelector::new().select_indices(&ms).unwrap();
        assert_eq!(indices, vec![3, 1, 4]);

        let chosen = select_closest(&ms).unwrap();
        let ranges: Vec<f64> = chosen.iter().map(|m| m.range).collect();
        assert_eq!(ranges, vec![2.0, 3.0, 5.0]);
        assert_eq!(chosen[0].anchor.id, AnchorId(3));
    }

    #[test]
    fn test_exactly_three_returns_all_sorted() {
        let ms = with_ranges(&[8.0, 1.0, 4.0]);
        let indices = AnchorSelector::new().select_indices(&ms).unwrap();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_insufficient_anchors() {
        let ms = with_ranges(&[1.0, 2.0]);
        assert_eq!(
            select_closest(&ms).unwrap_err(),
            LocalizationError::InsufficientAnchors {
                available: 2,
                required: 3
            }
        );
        assert!(select_closest(&[]).is_err());
    }

    #[test]
    fn test_ties_broken_by_input_order() {
        let ms = with_ranges(&[4.0, 2.0, 4.0, 2.0, 4.0]);
        let indices = AnchorSelector::new().select_indices(&ms).unwrap();
        assert_eq!(indices, vec![1, 3, 0]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let ms = with_ranges(&[0.0, -0.0, 4.0, 5.0]);
        assert_eq!(ms[0].range, ms[1].range);
        let indices = AnchorSelector::new().select_indices(&ms).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_selected_ranges_bound_the_rest() {
        let ranges = [6.5, 0.0, 12.0, 3.3, 3.3, 9.1, 1.2, 7.7];
        let ms = with_ranges(&ranges);
        let indices = AnchorSelector::new().select_indices(&ms).unwrap();
        assert_eq!(indices.len(), 3);
        let worst_selected = indices.iter().map(|&i| ranges[i]).fold(f64::MIN, f64::max);
        for (i, r) in ranges.iter().enumerate() {
            if !indices.contains(&i) {
                assert!(worst_selected <= *r);
            }
        }
    }

    #[test]
    fn test_same_anchors_under_permutation() {
        let ms = with_ranges(&[9.0, 3.0, 7.0, 2.0, 5.0, 11.0]);
        let mut expected: Vec<AnchorId> = select_closest(&ms).unwrap().iter().map(|m| m.anchor.id).collect();
        expected.sort();

        // rotate and reverse the input
        for shift in 0..ms.len() {
            let mut permuted = ms.clone();
            permuted.rotate_left(shift);
            for candidate in [permuted.clone(), permuted.into_iter().rev().collect()] {
                let mut ids: Vec<AnchorId> = select_closest(&candidate)
                    .unwrap()
                    .iter()
                    .map(|m| m.anchor.id)
                    .collect();
                ids.sort();
                assert_eq!(ids, expected);
            }
        }
    }

    #[test]
    fn test_k_closest() {
        let ms = with_ranges(&[9.0, 3.0, 7.0, 2.0, 5.0]);
        let chosen = select_k_closest(&ms, 4).unwrap();
        let ids: Vec<u32> = chosen.iter().map(|m| m.anchor.id.0).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
        assert!(select_k_closest(&ms, 6).is_err());
    }

    #[test]
    fn test_invalid_range_rejected_before_sorting() {
        let ms = with_ranges(&[1.0, f64::NAN, 2.0, 3.0]);
        assert!(matches!(
            select_closest(&ms),
            Err(LocalizationError::InvalidMeasurement { .. })
        ));
    }
}
