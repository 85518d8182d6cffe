//! Planar Localization
//!
//! Closed-form 2-D position fixing from fixed anchors: trilateration from
//! three range measurements, angulation from two bearings, and selection of
//! the three nearest anchors out of a larger layout. Degenerate geometry is
//! reported as a typed error instead of a meaningless coordinate.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{
    Anchor, AnchorId, AnchorLayout, BearingMeasurement, LayoutError, Point2D, RangeMeasurement,
};
pub use algorithms::{
    select_closest, select_k_closest, AnchorSelector, BearingSolver, GeometryQuality, RangeSolver,
    RayIntersection,
};
pub use validation::{CollinearityGuard, LocalizationError, LocalizationResult, MeasurementIssue, ParallelGuard};
pub use utils::{ConfigError, ConfigurationManager, SolverConfig};
pub use api::{
    bearing_solve, range_solve, CsvFormatter, FixFormatter, JsonFormatter, LocalizationFix,
    LocalizationMode, LocalizationRequest, Localizer, OutputFormat, TextFormatter,
};
