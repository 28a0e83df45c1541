//! Configuration and support utilities

pub mod config;

pub use config::{CalibrationConfig, ConfigError, LogLevel, SystemConfig};
