//! Runtime tessellation settings shared between the orchestrator and callers.
//!
//! Every public item documents its purpose so downstream crates can stay
//! declarative instead of scattering literals.

use std::fmt;

use crate::constants::{DEFAULT_ANGULAR_TOLERANCE, DEFAULT_DEVIATION, DEFAULT_RENDER_EDGES};

/// Immutable snapshot of the tessellation settings consumed by the
/// orchestrator.
///
/// # Examples
/// ```
/// use config::tessellation::TessellationConfig;
/// let config = TessellationConfig::default();
/// assert!(config.deviation > 0.0);
/// assert!(config.edge_accuracy.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationConfig {
    /// Linear tessellation coarseness driver.
    pub deviation: f64,
    /// Curvature sampling driver in radians.
    pub angular_tolerance: f64,
    /// Explicit override of the computed edge deflection.
    pub edge_accuracy: Option<f64>,
    /// Whether wireframe edges are computed alongside faces.
    pub render_edges: bool,
    /// Upper bound of concurrent tessellation workers. `None` runs the pass
    /// sequentially on the calling thread.
    pub max_workers: Option<usize>,
}

impl TessellationConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// values.
    ///
    /// # Examples
    /// ```
    /// use config::tessellation::TessellationConfig;
    /// let cfg = TessellationConfig::new(0.05, 0.3, None, false).expect("valid config");
    /// assert_eq!(cfg.deviation, 0.05);
    /// assert!(!cfg.render_edges);
    /// ```
    pub fn new(
        deviation: f64,
        angular_tolerance: f64,
        edge_accuracy: Option<f64>,
        render_edges: bool,
    ) -> Result<Self, ConfigError> {
        if !(deviation > 0.0) {
            return Err(ConfigError::InvalidDeviation(deviation));
        }
        if !(angular_tolerance > 0.0) {
            return Err(ConfigError::InvalidAngularTolerance(angular_tolerance));
        }
        if let Some(accuracy) = edge_accuracy {
            if !(accuracy > 0.0) {
                return Err(ConfigError::InvalidEdgeAccuracy(accuracy));
            }
        }
        Ok(Self {
            deviation,
            angular_tolerance,
            edge_accuracy,
            render_edges,
            max_workers: None,
        })
    }

    /// Enables the bounded worker pool for the tessellation pass.
    ///
    /// # Examples
    /// ```
    /// use config::tessellation::TessellationConfig;
    /// let cfg = TessellationConfig::default().with_max_workers(4).unwrap();
    /// assert_eq!(cfg.max_workers, Some(4));
    /// assert!(TessellationConfig::default().with_max_workers(0).is_err());
    /// ```
    pub fn with_max_workers(mut self, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(workers));
        }
        self.max_workers = Some(workers);
        Ok(self)
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            deviation: DEFAULT_DEVIATION,
            angular_tolerance: DEFAULT_ANGULAR_TOLERANCE,
            edge_accuracy: None,
            render_edges: DEFAULT_RENDER_EDGES,
            max_workers: None,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the deviation is zero, negative or NaN.
    InvalidDeviation(f64),
    /// Raised when the angular tolerance is zero, negative or NaN.
    InvalidAngularTolerance(f64),
    /// Raised when an explicit edge accuracy is zero, negative or NaN.
    InvalidEdgeAccuracy(f64),
    /// Raised when the worker pool would have no workers.
    InvalidWorkerCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDeviation(value) => {
                write!(f, "deviation must be positive: {value}")
            }
            ConfigError::InvalidAngularTolerance(value) => {
                write!(f, "angular_tolerance must be positive: {value}")
            }
            ConfigError::InvalidEdgeAccuracy(value) => {
                write!(f, "edge_accuracy must be positive: {value}")
            }
            ConfigError::InvalidWorkerCount(value) => {
                write!(f, "max_workers must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
