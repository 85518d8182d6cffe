//! Request-level localization facade
//!
//! Dispatches a [`LocalizationRequest`] to the right solver with the
//! configured tolerances and attaches geometry diagnostics to the result.
//! A `Localizer` holds nothing but its config, so one instance can serve
//! any number of threads.

use crate::algorithms::gdop::{self, GeometryQuality};
use crate::algorithms::{select_closest, BearingSolver, RangeSolver};
use crate::api::types::{LocalizationFix, LocalizationMode, LocalizationRequest};
use crate::core::{AnchorLayout, BearingMeasurement, LayoutError, Point2D, RangeMeasurement};
use crate::utils::config::{ConfigError, SolverConfig};
use crate::validation::error::LocalizationResult;
use log::{debug, warn};

/// Configured entry point for ranges, bearings and closest-three requests
pub struct Localizer {
    config: SolverConfig,
    range_solver: RangeSolver,
    bearing_solver: BearingSolver,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Localizer {
    /// Build a localizer from `config` as given.
    ///
    /// The config is not checked here; a zero or NaN tolerance disables the
    /// matching degeneracy guard. Use [`Localizer::try_new`] for configs that
    /// were assembled in code rather than loaded through
    /// [`SolverConfig::from_file`].
    pub fn new(config: SolverConfig) -> Self {
        Self {
            range_solver: RangeSolver::with_tolerance(config.collinearity_tolerance),
            bearing_solver: BearingSolver::with_tolerance(config.parallel_tolerance),
            config,
        }
    }

    /// Validate `config`, then build the localizer
    pub fn try_new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Anchor layout bounded by the configured maximum
    pub fn layout(&self, entries: Vec<RangeMeasurement>) -> Result<AnchorLayout, LayoutError> {
        AnchorLayout::with_max_anchors(entries, self.config.max_layout_anchors)
    }

    /// Solve one request.
    ///
    /// Range and closest requests carry HDOP and the RMS range residual;
    /// bearing requests carry the crossing angle. Inconsistent ranges, weak
    /// geometry and crossings behind an anchor add warnings to the fix but
    /// never change the position. Degenerate or malformed input returns the
    /// matching [`crate::validation::LocalizationError`].
    pub fn locate(&self, request: &LocalizationRequest) -> LocalizationResult<LocalizationFix> {
        let available = request.anchor_count();
        let result = match request {
            LocalizationRequest::Ranges { measurements } => {
                self.locate_ranges(measurements, LocalizationMode::Ranges, available)
            }
            LocalizationRequest::Bearings { measurements } => {
                self.locate_bearings(measurements, available)
            }
            LocalizationRequest::Closest { measurements } => select_closest(measurements)
                .and_then(|selected| {
                    self.locate_ranges(&selected, LocalizationMode::Closest, available)
                }),
        };

        if let Err(err) = &result {
            warn!("{} localization failed: {}", request.mode(), err);
        }
        result
    }

    fn locate_ranges(
        &self,
        measurements: &[RangeMeasurement; 3],
        mode: LocalizationMode,
        available: usize,
    ) -> LocalizationResult<LocalizationFix> {
        let position = self.range_solver.solve_array(measurements)?;

        let anchors: Vec<Point2D> = measurements.iter().map(|m| m.anchor.position).collect();
        let hdop = gdop::horizontal_dop(&anchors, &position);
        let geometry_quality = hdop.map_or(GeometryQuality::Degenerate, |h| {
            GeometryQuality::from_dop(h, &self.config.hdop_thresholds)
        });

        let residuals = gdop::range_residuals(measurements, &position);
        let rms_residual = gdop::rms(&residuals);

        let mut warnings = Vec::new();
        if rms_residual > self.config.residual_warning_threshold {
            warn!(
                "ranges are inconsistent: rms residual {:.3} exceeds {:.3}",
                rms_residual, self.config.residual_warning_threshold
            );
            warnings.push(format!(
                "ranges do not meet at one point (rms residual {:.3})",
                rms_residual
            ));
        }
        if !geometry_quality.is_usable() {
            warnings.push(format!("weak anchor geometry ({:?})", geometry_quality));
        }

        debug!(
            "{} fix {} hdop={:?} rms={:.3}",
            mode, position, hdop, rms_residual
        );
        Ok(LocalizationFix {
            position,
            mode,
            anchors_used: measurements.iter().map(|m| m.anchor.id).collect(),
            anchors_available: available,
            geometry_quality,
            hdop,
            crossing_angle_deg: None,
            rms_residual: Some(rms_residual),
            warnings,
        })
    }

    fn locate_bearings(
        &self,
        measurements: &[BearingMeasurement; 2],
        available: usize,
    ) -> LocalizationResult<LocalizationFix> {
        let [m1, m2] = measurements;
        let hit = self.bearing_solver.intersect(m1, m2)?;

        let angle = gdop::crossing_angle_deg(m1.bearing_deg, m2.bearing_deg);
        let geometry_quality = GeometryQuality::from_crossing_angle(angle);

        let mut warnings = Vec::new();
        if !hit.is_ahead_of_both() {
            warnings.push(format!(
                "bearing lines cross behind an anchor (t1={:.3}, t2={:.3})",
                hit.t1, hit.t2
            ));
        }
        if !geometry_quality.is_usable() {
            warnings.push(format!("shallow crossing angle {:.1}°", angle));
        }

        debug!("bearings fix {} crossing {:.1}°", hit.point, angle);
        Ok(LocalizationFix {
            position: hit.point,
            mode: LocalizationMode::Bearings,
            anchors_used: vec![m1.anchor.id, m2.anchor.id],
            anchors_available: available,
            geometry_quality,
            hdop: None,
            crossing_angle_deg: Some(angle),
            rms_residual: None,
            warnings,
        })
    }
}
