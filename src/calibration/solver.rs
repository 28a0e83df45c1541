//! Linear solve of the calibration design matrix

use crate::calibration::{coefficient_count, quadratic_basis, CalibrationError, CalibrationModel};
use crate::core::{IntensityVector, ReferencePoint};
use nalgebra::{DMatrix, DVector};

/// One reference position paired with its stabilized intensity vector
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSample {
    pub reference: ReferencePoint,
    pub intensities: IntensityVector,
}

/// Solves the square calibration system for both coordinate axes
///
/// The design matrix is R x R with R = 2K+1: one row of basis values
/// per reference point. It is solved twice against the same LU
/// factorization, once for the x coordinates and once for y. Reference
/// positions must be chosen so the rows stay independent — singularity
/// is surfaced, never patched around.
#[derive(Debug, Clone)]
pub struct CalibrationSolver {
    emitter_count: usize,
}

impl CalibrationSolver {
    pub fn new(emitter_count: usize) -> Self {
        Self { emitter_count }
    }

    pub fn solve(&self, samples: &[CalibrationSample]) -> Result<CalibrationModel, CalibrationError> {
        let size = coefficient_count(self.emitter_count);
        if samples.len() != size {
            return Err(CalibrationError::SampleCountMismatch {
                expected: size,
                actual: samples.len(),
            });
        }

        let mut design = DMatrix::zeros(size, size);
        for (row, sample) in samples.iter().enumerate() {
            let basis = quadratic_basis(&sample.intensities);
            for col in 0..size {
                design[(row, col)] = basis[col];
            }
        }

        let x_targets = DVector::from_iterator(size, samples.iter().map(|s| s.reference.x));
        let y_targets = DVector::from_iterator(size, samples.iter().map(|s| s.reference.y));

        let lu = design.lu();
        let x_coefficients = lu
            .solve(&x_targets)
            .ok_or(CalibrationError::SingularSystem { size })?;
        let y_coefficients = lu
            .solve(&y_targets)
            .ok_or(CalibrationError::SingularSystem { size })?;

        Ok(CalibrationModel::new(x_coefficients, y_coefficients))
    }
}
