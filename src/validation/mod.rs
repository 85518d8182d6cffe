//! Input validation, degeneracy guards and the error taxonomy

pub mod data;
pub mod error;
pub mod guards;

pub use data::{validate_bearing, validate_range, validate_ranges};
pub use error::{LocalizationError, LocalizationResult, MeasurementIssue};
pub use guards::{CollinearityGuard, ParallelGuard};
