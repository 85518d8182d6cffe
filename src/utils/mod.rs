//! Configuration

pub mod config;

pub use config::{ConfigError, ConfigurationManager, SolverConfig};
