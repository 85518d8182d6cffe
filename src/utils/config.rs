use crate::core::{COLLINEARITY_TOLERANCE, MAX_LAYOUT_ANCHORS, PARALLEL_TOLERANCE, RANGE_ANCHORS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Solver tolerances and reporting thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Twice-signed triangle area below which three anchors are collinear
    pub collinearity_tolerance: f64,
    /// `|sin(θ2 - θ1)|` below which two bearings are parallel
    pub parallel_tolerance: f64,
    /// RMS range residual above which a range fix carries a warning
    pub residual_warning_threshold: f64,
    /// Upper HDOP bounds for excellent, good and acceptable geometry
    pub hdop_thresholds: [f64; 3],
    /// Largest anchor layout the caller may build
    pub max_layout_anchors: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            collinearity_tolerance: COLLINEARITY_TOLERANCE,
            parallel_tolerance: PARALLEL_TOLERANCE,
            residual_warning_threshold: 0.5,
            hdop_thresholds: [2.0, 5.0, 10.0],
            max_layout_anchors: MAX_LAYOUT_ANCHORS,
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
}

fn invalid(parameter: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason,
    }
}

impl SolverConfig {
    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        debug!("loaded solver config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject tolerances that would make every configuration degenerate or
    /// none of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.collinearity_tolerance.is_finite() && self.collinearity_tolerance > 0.0) {
            return Err(invalid(
                "collinearity_tolerance",
                self.collinearity_tolerance,
                "must be finite and positive",
            ));
        }
        if !(self.parallel_tolerance.is_finite()
            && self.parallel_tolerance > 0.0
            && self.parallel_tolerance < 1.0)
        {
            return Err(invalid(
                "parallel_tolerance",
                self.parallel_tolerance,
                "must lie in (0, 1)",
            ));
        }
        if !(self.residual_warning_threshold.is_finite() && self.residual_warning_threshold >= 0.0) {
            return Err(invalid(
                "residual_warning_threshold",
                self.residual_warning_threshold,
                "must be finite and non-negative",
            ));
        }
        let [excellent, good, acceptable] = self.hdop_thresholds;
        if !(excellent > 0.0 && excellent < good && good < acceptable && acceptable.is_finite()) {
            return Err(invalid(
                "hdop_thresholds",
                format!("{:?}", self.hdop_thresholds),
                "must be positive, finite and strictly ascending",
            ));
        }
        if self.max_layout_anchors < RANGE_ANCHORS {
            return Err(invalid(
                "max_layout_anchors",
                self.max_layout_anchors,
                "must be at least 3",
            ));
        }
        Ok(())
    }
}

/// Holds the active config and tracks unsaved edits
pub struct ConfigurationManager {
    config: SolverConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = SolverConfig::from_file(&path)?;
        Ok(Self {
            config,
            config_file_path: Some(path.as_ref().to_path_buf()),
            is_modified: false,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Replace the whole config after validating it
    pub fn update(&mut self, config: SolverConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Returns the previous value
    pub fn set_collinearity_tolerance(&mut self, tolerance: f64) -> Result<f64, ConfigError> {
        let mut next = self.config.clone();
        next.collinearity_tolerance = tolerance;
        let previous = self.config.collinearity_tolerance;
        self.update(next)?;
        Ok(previous)
    }

    /// Returns the previous value
    pub fn set_parallel_tolerance(&mut self, tolerance: f64) -> Result<f64, ConfigError> {
        let mut next = self.config.clone();
        next.parallel_tolerance = tolerance;
        let previous = self.config.parallel_tolerance;
        self.update(next)?;
        Ok(previous)
    }

    /// Returns the previous value
    pub fn set_residual_warning_threshold(&mut self, threshold: f64) -> Result<f64, ConfigError> {
        let mut next = self.config.clone();
        next.residual_warning_threshold = threshold;
        let previous = self.config.residual_warning_threshold;
        self.update(next)?;
        Ok(previous)
    }

    /// Write back to the file this manager was loaded from
    pub fn save(&mut self) -> Result<(), ConfigError> {
        let path = self
            .config_file_path
            .clone()
            .ok_or_else(|| invalid("config_file_path", "<none>", "no file associated"))?;
        self.save_to_file(path)
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        self.config.save_to_file(&path)?;
        self.config_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }
}
