//! Tolerances and anchor-count limits

/// Twice-signed triangle area below which three anchors count as collinear
pub const COLLINEARITY_TOLERANCE: f64 = 1e-9;

/// Cross product of two unit bearing directions below which the rays count as parallel
pub const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Anchors consumed by the range solver
pub const RANGE_ANCHORS: usize = 3;

/// Anchors consumed by the bearing solver
pub const BEARING_ANCHORS: usize = 2;

/// Largest anchor layout a caller may hold
pub const MAX_LAYOUT_ANCHORS: usize = 10;
