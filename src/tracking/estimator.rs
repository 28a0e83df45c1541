//! Position estimation from the calibrated model

use crate::calibration::CalibrationModel;
use crate::core::{IntensityVector, Position};

/// Result of evaluating one stabilized reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
    /// Every emitter registered above baseline; the model applies
    Valid(Position),
    /// At least one stabilized intensity was non-positive — the
    /// receiver is occluded, moving, or the window was degenerate.
    /// No position is computed for such a reading.
    Unsteady,
}

/// Evaluates the calibrated quadratic model on stabilized readings
pub struct PositionEstimator {
    model: CalibrationModel,
}

impl PositionEstimator {
    pub fn new(model: CalibrationModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &CalibrationModel {
        &self.model
    }

    pub fn estimate(&self, stabilized: &IntensityVector) -> Estimate {
        if !stabilized.all_positive() {
            return Estimate::Unsteady;
        }
        Estimate::Valid(self.model.evaluate(stabilized))
    }
}
