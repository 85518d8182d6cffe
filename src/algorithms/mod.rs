//! Core localization algorithms

pub mod trilateration;
pub mod angulation;
pub mod selection;
pub mod gdop;

pub use trilateration::RangeSolver;
pub use angulation::{BearingSolver, RayIntersection};
pub use selection::{select_closest, select_k_closest, AnchorSelector};
pub use gdop::GeometryQuality;
