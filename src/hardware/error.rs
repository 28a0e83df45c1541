//! Hardware error types

use std::fmt;

/// Error conditions raised by the sampler and display drivers
#[derive(Debug, Clone, PartialEq)]
pub enum HwError {
    /// Requested ADC channel is outside the converter's range
    InvalidChannel { channel: u8, limit: u8 },
    /// Driver was constructed or reconfigured with unusable parameters
    ConfigurationError { parameter: String, value: String },
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwError::InvalidChannel { channel, limit } => {
                write!(f, "invalid ADC channel {} (limit {})", channel, limit)
            }
            HwError::ConfigurationError { parameter, value } => {
                write!(f, "configuration error: invalid {} = {}", parameter, value)
            }
        }
    }
}

impl std::error::Error for HwError {}

/// Result type for hardware operations
pub type HwResult<T> = Result<T, HwError>;
