//! Core data types for the positioning pipeline

use serde::{Deserialize, Serialize};

/// 2D position in the calibrated reference frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Known physical location used during calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
}

/// Per-emitter, baseline-corrected signal strengths for one cycle
///
/// Always holds exactly one entry per emitter; cycles that cannot
/// produce a full vector are rejected before this type is built.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityVector {
    pub values: Vec<f64>,
}

impl IntensityVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn emitter_count(&self) -> usize {
        self.values.len()
    }

    /// A reading is usable only when every emitter registered above baseline
    pub fn all_positive(&self) -> bool {
        self.values.iter().all(|&v| v > 0.0)
    }
}
