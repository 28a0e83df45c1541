//! Quadratic basis functions and the fitted position model

use crate::core::{IntensityVector, Position};
use nalgebra::DVector;

/// Free coefficients in the quadratic model for K emitters:
/// K squared terms, K linear terms, and a constant
pub fn coefficient_count(emitter_count: usize) -> usize {
    2 * emitter_count + 1
}

/// Basis vector [I_1^2 .. I_K^2, I_1 .. I_K, 1] for one intensity vector
///
/// Calibration rows and runtime evaluation must use this exact
/// combination; the solve is only meaningful against the same basis it
/// was built from.
pub fn quadratic_basis(intensities: &IntensityVector) -> DVector<f64> {
    let k = intensities.emitter_count();
    let mut basis = DVector::zeros(coefficient_count(k));
    for (i, &value) in intensities.values.iter().enumerate() {
        basis[i] = value * value;
        basis[k + i] = value;
    }
    basis[2 * k] = 1.0;
    basis
}

/// Coefficient vectors mapping a stabilized intensity vector to (x, y)
///
/// Fit once per device session; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationModel {
    x_coefficients: DVector<f64>,
    y_coefficients: DVector<f64>,
}

impl CalibrationModel {
    pub fn new(x_coefficients: DVector<f64>, y_coefficients: DVector<f64>) -> Self {
        Self {
            x_coefficients,
            y_coefficients,
        }
    }

    pub fn emitter_count(&self) -> usize {
        (self.x_coefficients.len() - 1) / 2
    }

    pub fn x_coefficients(&self) -> &DVector<f64> {
        &self.x_coefficients
    }

    pub fn y_coefficients(&self) -> &DVector<f64> {
        &self.y_coefficients
    }

    /// Evaluate the model on a stabilized intensity vector
    pub fn evaluate(&self, intensities: &IntensityVector) -> Position {
        let basis = quadratic_basis(intensities);
        Position {
            x: basis.dot(&self.x_coefficients),
            y: basis.dot(&self.y_coefficients),
        }
    }
}
