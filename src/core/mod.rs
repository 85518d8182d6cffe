//! Core types, constants and caller-side anchor state

pub mod types;
pub mod constants;
pub mod layout;

pub use types::*;
pub use constants::*;
pub use layout::{AnchorLayout, LayoutError};
