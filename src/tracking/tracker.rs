//! Steady-state tracking loop
//!
//! Outer state machine over the measurement pipeline: collect a full
//! averaging window (any rejected cycle empties it and reports invalid
//! conditions), stabilize it, then either emit a position or flag the
//! reading as unsteady. The loop never terminates on its own.

use crate::calibration::CalibrationModel;
use crate::core::Position;
use crate::hardware::{DisplayInterface, DisplayLine, HwError, SamplerInterface};
use crate::processing::{
    AveragingWindow, CycleError, MeasurementPipeline, OutlierRobustAverager,
};
use crate::tracking::{Estimate, PositionEstimator};
use crate::utils::{LogLevel, SystemConfig};

/// What one completed averaging window produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingOutcome {
    Position(Position),
    Unsteady,
}

/// Running counters for the tracking loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerStats {
    pub cycles_run: u32,
    pub invalid_cycles: u32,
    pub windows_stabilized: u32,
    pub positions_emitted: u32,
    pub unsteady_readings: u32,
}

/// Owns the hardware and drives the capture-to-position loop
pub struct PositionTracker<S: SamplerInterface, D: DisplayInterface> {
    sampler: S,
    display: D,
    pipeline: MeasurementPipeline,
    averager: OutlierRobustAverager,
    window: AveragingWindow,
    estimator: PositionEstimator,
    log_level: LogLevel,
    stats: TrackerStats,
}

impl<S: SamplerInterface, D: DisplayInterface> PositionTracker<S, D> {
    pub fn new(config: &SystemConfig, model: CalibrationModel, sampler: S, display: D) -> Self {
        Self {
            sampler,
            display,
            pipeline: MeasurementPipeline::from_config(config),
            averager: OutlierRobustAverager::new(config.outlier_threshold),
            window: AveragingWindow::new(config.averaging_period),
            estimator: PositionEstimator::new(model),
            log_level: config.log_level,
            stats: TrackerStats::default(),
        }
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Collect one full averaging window and report its outcome
    ///
    /// Blocks until enough valid cycles accumulate; rejected cycles
    /// reset the window and keep the loop in the collecting state.
    pub fn track_once(&mut self) -> Result<TrackingOutcome, HwError> {
        self.window.reset();

        while !self.window.is_full() {
            self.stats.cycles_run += 1;
            match self.pipeline.measure_cycle(&mut self.sampler) {
                Ok(vector) => self.window.push(vector),
                Err(CycleError::Hardware(e)) => return Err(e),
                Err(CycleError::Segmentation(reason)) => {
                    self.stats.invalid_cycles += 1;
                    self.window.reset();
                    self.display.write_line(DisplayLine::Top, "Invalid")?;
                    self.display.write_line(DisplayLine::Bottom, "conditions")?;
                    if self.log_level >= LogLevel::Warn {
                        eprintln!("invalid conditions: {}", reason);
                    }
                }
            }
        }

        let stabilized = self.averager.stabilize(&self.window);
        self.stats.windows_stabilized += 1;

        match self.estimator.estimate(&stabilized) {
            Estimate::Valid(position) => {
                self.stats.positions_emitted += 1;
                self.display
                    .write_line(DisplayLine::Top, &format!("x:{:.3}", position.x))?;
                self.display
                    .write_line(DisplayLine::Bottom, &format!("y:{:.3}", position.y))?;
                if self.log_level >= LogLevel::Info {
                    println!("position: x={:.3} y={:.3}", position.x, position.y);
                }
                Ok(TrackingOutcome::Position(position))
            }
            Estimate::Unsteady => {
                self.stats.unsteady_readings += 1;
                self.display.write_line(DisplayLine::Top, "Unsteady!")?;
                self.display.write_line(DisplayLine::Bottom, "Pls stabilise!")?;
                if self.log_level >= LogLevel::Warn {
                    eprintln!("unsteady reading: {:?}", stabilized.values);
                }
                Ok(TrackingOutcome::Unsteady)
            }
        }
    }

    /// Run indefinitely; only a hardware failure breaks the loop
    pub fn run(&mut self) -> Result<(), HwError> {
        loop {
            self.track_once()?;
        }
    }
}
