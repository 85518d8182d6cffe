//! Input validation for measurements
//!
//! Solvers call these before any arithmetic so that NaN or infinite inputs are
//! reported as `InvalidMeasurement` instead of leaking into the result.

use crate::core::{Anchor, BearingMeasurement, RangeMeasurement};
use crate::validation::error::{LocalizationError, LocalizationResult, MeasurementIssue};
use log::warn;

/// Anchor coordinates must be finite
pub fn validate_anchor(anchor: &Anchor) -> LocalizationResult<()> {
    if anchor.position.is_finite() {
        return Ok(());
    }
    let value = if anchor.position.x().is_finite() {
        anchor.position.y()
    } else {
        anchor.position.x()
    };
    warn!("rejecting anchor {}: non-finite position", anchor.id);
    Err(LocalizationError::InvalidMeasurement {
        anchor: anchor.id,
        issue: MeasurementIssue::NonFiniteAnchor,
        value,
    })
}

/// Range must be finite and non-negative; zero is accepted
pub fn validate_range(measurement: &RangeMeasurement) -> LocalizationResult<()> {
    validate_anchor(&measurement.anchor)?;

    let range = measurement.range;
    let issue = if !range.is_finite() {
        Some(MeasurementIssue::NonFiniteRange)
    } else if range < 0.0 {
        Some(MeasurementIssue::NegativeRange)
    } else {
        None
    };

    match issue {
        None => Ok(()),
        Some(issue) => {
            warn!("rejecting range from {}: {} ({})", measurement.anchor.id, issue, range);
            Err(LocalizationError::InvalidMeasurement {
                anchor: measurement.anchor.id,
                issue,
                value: range,
            })
        }
    }
}

/// Bearing must be finite; any finite angle is accepted and wraps naturally
pub fn validate_bearing(measurement: &BearingMeasurement) -> LocalizationResult<()> {
    validate_anchor(&measurement.anchor)?;

    if measurement.bearing_deg.is_finite() {
        return Ok(());
    }
    warn!(
        "rejecting bearing from {}: non-finite angle",
        measurement.anchor.id
    );
    Err(LocalizationError::InvalidMeasurement {
        anchor: measurement.anchor.id,
        issue: MeasurementIssue::NonFiniteBearing,
        value: measurement.bearing_deg,
    })
}

/// Validate every range in a slice, stopping at the first failure
pub fn validate_ranges(measurements: &[RangeMeasurement]) -> LocalizationResult<()> {
    measurements.iter().try_for_each(validate_range)
}
