//! Calibration error types

use crate::hardware::HwError;
use std::fmt;

/// Failures raised while building or solving the calibration model
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// One reference point kept failing segmentation; the whole pass
    /// is discarded and restarted from the first point
    ReferencePointFailed { point: usize, attempts: u32 },
    /// The design matrix is singular; the reference points produced
    /// linearly dependent rows and no model exists for them.
    /// Not recoverable automatically — the operator must re-run
    /// calibration with better-conditioned reference positions.
    SingularSystem { size: usize },
    /// Solver was handed the wrong number of samples for the model
    SampleCountMismatch { expected: usize, actual: usize },
    /// The sampler or display failed mid-routine
    Hardware(HwError),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::ReferencePointFailed { point, attempts } => {
                write!(
                    f,
                    "reference point {} failed after {} invalid cycles",
                    point + 1,
                    attempts
                )
            }
            CalibrationError::SingularSystem { size } => {
                write!(f, "singular {}x{} calibration system", size, size)
            }
            CalibrationError::SampleCountMismatch { expected, actual } => {
                write!(
                    f,
                    "calibration needs {} samples, got {}",
                    expected, actual
                )
            }
            CalibrationError::Hardware(e) => write!(f, "hardware failure: {}", e),
        }
    }
}

impl std::error::Error for CalibrationError {}

impl From<HwError> for CalibrationError {
    fn from(error: HwError) -> Self {
        CalibrationError::Hardware(error)
    }
}
