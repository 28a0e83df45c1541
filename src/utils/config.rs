//! System configuration with validation and JSON persistence

use crate::calibration::coefficient_count;
use crate::core::{
    ReferencePoint, AVERAGING_PERIOD, EDGE_THRESHOLD, EMITTER_COUNT, MAX_BOUNDARIES,
    OUTLIER_THRESHOLD, SAMPLE_BUFFER_LEN,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Console log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and info messages
    Info,
    /// All messages including debug
    Debug,
}

/// Calibration routine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Seconds the operator gets to place the receiver at each point
    pub countdown_secs: u32,
    /// Pause before a failed calibration pass restarts (seconds)
    pub restart_delay_secs: u64,
    /// Invalid cycles tolerated per reference point before the whole
    /// pass is abandoned and restarted
    pub max_cycle_failures: u32,
    /// Known receiver positions, one per model coefficient
    pub reference_points: Vec<ReferencePoint>,
}

/// System-wide configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Raw samples captured per measurement cycle
    pub sample_buffer_len: usize,
    /// Sample-to-sample jump that counts as a section edge
    pub edge_threshold: i32,
    /// Capacity of the per-cycle boundary list
    pub max_boundaries: usize,
    /// Number of directional emitters (3 or 4)
    pub emitter_count: usize,
    /// Distance from the window median beyond which a value is dropped
    pub outlier_threshold: f64,
    /// Valid cycles per stabilized reading
    pub averaging_period: usize,
    /// ADC channel the receiver photodiode is wired to
    pub adc_channel: u8,
    /// Console log verbosity
    pub log_level: LogLevel,
    /// Calibration routine parameters
    pub calibration: CalibrationConfig,
}

/// Configuration validation and persistence errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "invalid {} = {}: {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => write!(f, "config I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "config serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 10,
            restart_delay_secs: 5,
            max_cycle_failures: 20,
            reference_points: vec![
                ReferencePoint { x: 0.0, y: 0.0 },
                ReferencePoint { x: 1.0, y: 0.0 },
                ReferencePoint { x: 1.0, y: 1.0 },
                ReferencePoint { x: 0.0, y: 1.0 },
                ReferencePoint { x: 0.5, y: 0.5 },
                ReferencePoint { x: 0.5, y: 0.0 },
                ReferencePoint { x: 0.0, y: 0.5 },
            ],
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            sample_buffer_len: SAMPLE_BUFFER_LEN,
            edge_threshold: EDGE_THRESHOLD,
            max_boundaries: MAX_BOUNDARIES,
            emitter_count: EMITTER_COUNT,
            outlier_threshold: OUTLIER_THRESHOLD,
            averaging_period: AVERAGING_PERIOD,
            adc_channel: 0,
            log_level: LogLevel::Info,
            calibration: CalibrationConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Check parameter consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(3..=4).contains(&self.emitter_count) {
            return Err(invalid(
                "emitter_count",
                self.emitter_count,
                "must be 3 or 4",
            ));
        }
        if self.edge_threshold <= 0 {
            return Err(invalid(
                "edge_threshold",
                self.edge_threshold,
                "must be positive",
            ));
        }
        if self.outlier_threshold <= 0.0 {
            return Err(invalid(
                "outlier_threshold",
                self.outlier_threshold,
                "must be positive",
            ));
        }
        if self.averaging_period == 0 {
            return Err(invalid(
                "averaging_period",
                self.averaging_period,
                "must be at least 1",
            ));
        }
        // The selector may start a cycle as late as boundary 2K+1 and
        // reads 2K+2 more from there.
        let needed = 4 * self.emitter_count + 3;
        if self.max_boundaries < needed {
            return Err(invalid(
                "max_boundaries",
                self.max_boundaries,
                &format!("must hold one full cycle, at least {}", needed),
            ));
        }
        if self.sample_buffer_len < 2 * self.max_boundaries {
            return Err(invalid(
                "sample_buffer_len",
                self.sample_buffer_len,
                "too short to carry the boundary structure",
            ));
        }
        let expected_points = coefficient_count(self.emitter_count);
        if self.calibration.reference_points.len() != expected_points {
            return Err(invalid(
                "calibration.reference_points",
                self.calibration.reference_points.len(),
                &format!("quadratic model needs exactly {} points", expected_points),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;
        let config: SystemConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: e.to_string(),
            })?;
        fs::write(path, content).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })
    }
}

fn invalid<V: fmt::Display>(parameter: &str, value: V, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SystemConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_wrong_emitter_count() {
        let config = SystemConfig {
            emitter_count: 2,
            ..SystemConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == "emitter_count"
        ));
    }

    #[test]
    fn test_rejects_reference_point_mismatch() {
        let mut config = SystemConfig::default();
        config.calibration.reference_points.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_four_emitters_need_nine_points() {
        let mut config = SystemConfig {
            emitter_count: 4,
            max_boundaries: 20,
            ..SystemConfig::default()
        };
        assert!(config.validate().is_err());

        config.calibration.reference_points = (0..9)
            .map(|i| ReferencePoint {
                x: i as f64,
                y: (i * i) as f64,
            })
            .collect();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_small_boundary_capacity() {
        let config = SystemConfig {
            max_boundaries: 8,
            ..SystemConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug > LogLevel::Info);
        assert!(LogLevel::Warn > LogLevel::Error);
        assert!(LogLevel::None < LogLevel::Error);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SystemConfig::default();
        let path = std::env::temp_dir().join("photoloc_config_roundtrip.json");

        config.save_to_file(&path).unwrap();
        let loaded = SystemConfig::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.sample_buffer_len, config.sample_buffer_len);
        assert_eq!(loaded.emitter_count, config.emitter_count);
        assert_eq!(
            loaded.calibration.reference_points,
            config.calibration.reference_points
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SystemConfig::from_file("/nonexistent/photoloc.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
