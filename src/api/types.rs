//! Request and response types for the localizer

use crate::algorithms::gdop::GeometryQuality;
use crate::core::{AnchorId, AnchorLayout, BearingMeasurement, Point2D, RangeMeasurement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One localization request, tagged by `mode` in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocalizationRequest {
    /// Trilaterate from exactly three ranges
    Ranges { measurements: [RangeMeasurement; 3] },
    /// Intersect exactly two bearings
    Bearings { measurements: [BearingMeasurement; 2] },
    /// Pick the three smallest of N ranges, then trilaterate
    Closest { measurements: Vec<RangeMeasurement> },
}

impl LocalizationRequest {
    /// Three-anchor request from the first three anchors of a layout
    pub fn ranges_from(layout: &AnchorLayout) -> Self {
        LocalizationRequest::Ranges {
            measurements: layout.first_three(),
        }
    }

    /// Closest-three request over every anchor of a layout
    pub fn closest_from(layout: &AnchorLayout) -> Self {
        LocalizationRequest::Closest {
            measurements: layout.range_snapshot(),
        }
    }

    /// Bearing request observed from the first two anchors of a layout
    pub fn bearings_from(layout: &AnchorLayout, theta1_deg: f64, theta2_deg: f64) -> Self {
        LocalizationRequest::Bearings {
            measurements: layout.bearing_pair(theta1_deg, theta2_deg),
        }
    }

    pub fn mode(&self) -> LocalizationMode {
        match self {
            LocalizationRequest::Ranges { .. } => LocalizationMode::Ranges,
            LocalizationRequest::Bearings { .. } => LocalizationMode::Bearings,
            LocalizationRequest::Closest { .. } => LocalizationMode::Closest,
        }
    }

    /// Anchors supplied with the request, selected or not
    pub fn anchor_count(&self) -> usize {
        match self {
            LocalizationRequest::Ranges { measurements } => measurements.len(),
            LocalizationRequest::Bearings { measurements } => measurements.len(),
            LocalizationRequest::Closest { measurements } => measurements.len(),
        }
    }
}

/// Which solver path produced a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalizationMode {
    Ranges,
    Bearings,
    Closest,
}

impl fmt::Display for LocalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocalizationMode::Ranges => "ranges",
            LocalizationMode::Bearings => "bearings",
            LocalizationMode::Closest => "closest",
        };
        f.write_str(name)
    }
}

/// Solved position plus diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationFix {
    pub position: Point2D,
    pub mode: LocalizationMode,
    /// Anchors the solver actually used, in the order it used them
    pub anchors_used: Vec<AnchorId>,
    /// Anchors supplied with the request
    pub anchors_available: usize,
    pub geometry_quality: GeometryQuality,
    /// Horizontal dilution of precision; range fixes only
    pub hdop: Option<f64>,
    /// Acute angle between the bearing lines; bearing fixes only
    pub crossing_angle_deg: Option<f64>,
    /// RMS of `|P - anchor| - range` over the anchors used; range fixes only
    pub rms_residual: Option<f64>,
    pub warnings: Vec<String>,
}

impl LocalizationFix {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
