//! Configuration for bend editing

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tunables for the bend editing policy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BendConfig {
    /// Distance at which a dragged point merges into a neighbour
    pub point_overlay_threshold: f64,

    /// Distance at which a dragged segment merges into an aligned neighbour
    /// segment (also used for point overlay when two points are dragged)
    pub segment_overlay_threshold: f64,

    /// Tolerance for "same axis position" and segment orientation tests
    pub axis_tolerance: f64,

    /// Tolerance for parallel and zero-length segment tests during normalization
    pub parallel_epsilon: f64,

    /// Upper bound on removals per normalization run
    pub max_normalization_passes: usize,
}

impl Default for BendConfig {
    fn default() -> Self {
        Self {
            point_overlay_threshold: 10.0,
            segment_overlay_threshold: 6.0,
            axis_tolerance: 1.0,
            parallel_epsilon: 1e-6,
            max_normalization_passes: 256,
        }
    }
}

impl BendConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Set the single-point overlay threshold
    pub fn with_point_overlay_threshold(mut self, threshold: f64) -> Self {
        self.point_overlay_threshold = threshold;
        self
    }

    /// Set the segment overlay threshold
    pub fn with_segment_overlay_threshold(mut self, threshold: f64) -> Self {
        self.segment_overlay_threshold = threshold;
        self
    }

    /// Set the axis tolerance
    pub fn with_axis_tolerance(mut self, tolerance: f64) -> Self {
        self.axis_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BendConfig::default();
        assert_eq!(config.point_overlay_threshold, 10.0);
        assert_eq!(config.segment_overlay_threshold, 6.0);
        assert_eq!(config.axis_tolerance, 1.0);
        assert_eq!(config.max_normalization_passes, 256);
    }

    #[test]
    fn test_builder_pattern() {
        let config = BendConfig::new()
            .with_point_overlay_threshold(4.0)
            .with_axis_tolerance(0.5);
        assert_eq!(config.point_overlay_threshold, 4.0);
        assert_eq!(config.axis_tolerance, 0.5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BendConfig::from_toml_str("segment_overlay_threshold = 8.0\n").unwrap();
        assert_eq!(config.segment_overlay_threshold, 8.0);
        assert_eq!(config.point_overlay_threshold, 10.0);
    }

    #[test]
    fn test_invalid_toml() {
        let result = BendConfig::from_toml_str("point_overlay_threshold = \"far\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
