//! Error taxonomy for localization requests
//!
//! Every variant is an expected, recoverable outcome that the caller is meant
//! to display or act on. Nothing in the engine panics on bad geometry.

use crate::core::AnchorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a single measurement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementIssue {
    NegativeRange,
    NonFiniteRange,
    NonFiniteBearing,
    NonFiniteAnchor,
}

impl fmt::Display for MeasurementIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MeasurementIssue::NegativeRange => "range is negative",
            MeasurementIssue::NonFiniteRange => "range is not finite",
            MeasurementIssue::NonFiniteBearing => "bearing is not finite",
            MeasurementIssue::NonFiniteAnchor => "anchor position is not finite",
        };
        f.write_str(text)
    }
}

/// Failure reasons returned by the solvers and the selector
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalizationError {
    #[error("anchors {anchors:?} are collinear (twice-signed area {twice_area:.3e})")]
    CollinearAnchors {
        anchors: [AnchorId; 3],
        twice_area: f64,
    },
    #[error("bearing rays from {anchors:?} are parallel ({theta1_deg}° vs {theta2_deg}°)")]
    ParallelBearings {
        anchors: [AnchorId; 2],
        theta1_deg: f64,
        theta2_deg: f64,
    },
    #[error("insufficient anchors: {available} available, {required} required")]
    InsufficientAnchors { available: usize, required: usize },
    #[error("invalid measurement for anchor {anchor}: {issue} ({value})")]
    InvalidMeasurement {
        anchor: AnchorId,
        issue: MeasurementIssue,
        value: f64,
    },
    #[error("solution is not finite ({x}, {y})")]
    NonFiniteSolution { x: f64, y: f64 },
}

impl LocalizationError {
    /// The anchors or rays are badly placed; new measurements from the same
    /// placement will fail the same way.
    pub fn is_geometry_failure(&self) -> bool {
        matches!(
            self,
            LocalizationError::CollinearAnchors { .. } | LocalizationError::ParallelBearings { .. }
        )
    }

    /// The input itself is malformed or incomplete.
    pub fn is_input_failure(&self) -> bool {
        matches!(
            self,
            LocalizationError::InsufficientAnchors { .. }
                | LocalizationError::InvalidMeasurement { .. }
        )
    }

    /// Short machine-readable name, used by the CSV formatter.
    pub fn kind(&self) -> &'static str {
        match self {
            LocalizationError::CollinearAnchors { .. } => "collinear_anchors",
            LocalizationError::ParallelBearings { .. } => "parallel_bearings",
            LocalizationError::InsufficientAnchors { .. } => "insufficient_anchors",
            LocalizationError::InvalidMeasurement { .. } => "invalid_measurement",
            LocalizationError::NonFiniteSolution { .. } => "non_finite_solution",
        }
    }
}

/// Result of a single localization call
pub type LocalizationResult<T> = Result<T, LocalizationError>;
