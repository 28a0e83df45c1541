//! Interactive calibration routine
//!
//! Walks the operator through placing the receiver at each reference
//! point: a prompt with the target coordinates, a countdown, then
//! enough valid cycles to stabilize one intensity vector. A reference
//! point that keeps failing aborts the pass; the routine restarts from
//! the first point rather than patching a half-built design matrix.

use crate::calibration::{CalibrationError, CalibrationModel, CalibrationSample, CalibrationSolver};
use crate::core::ReferencePoint;
use crate::hardware::{DisplayInterface, DisplayLine, SamplerInterface};
use crate::processing::{AveragingWindow, CycleError, MeasurementPipeline, OutlierRobustAverager};
use crate::utils::{LogLevel, SystemConfig};
use std::time::Duration;

/// Timing of the operator-facing calibration prompts
#[derive(Debug, Clone)]
pub struct CalibrationSchedule {
    /// Seconds counted down before each reference point is measured
    pub countdown_secs: u32,
    /// Real-time length of one countdown step
    pub tick: Duration,
    /// Pause before a failed pass restarts
    pub restart_delay: Duration,
}

impl CalibrationSchedule {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            countdown_secs: config.calibration.countdown_secs,
            tick: Duration::from_secs(1),
            restart_delay: Duration::from_secs(config.calibration.restart_delay_secs),
        }
    }

    /// Schedule with no real-time waits (synthetic-waveform runs)
    pub fn immediate(countdown_secs: u32) -> Self {
        Self {
            countdown_secs,
            tick: Duration::ZERO,
            restart_delay: Duration::ZERO,
        }
    }
}

/// Runs the full calibration pass and solves the position model
pub struct CalibrationRoutine {
    pipeline: MeasurementPipeline,
    averager: OutlierRobustAverager,
    solver: CalibrationSolver,
    reference_points: Vec<ReferencePoint>,
    averaging_period: usize,
    max_cycle_failures: u32,
    schedule: CalibrationSchedule,
    log_level: LogLevel,
}

impl CalibrationRoutine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            pipeline: MeasurementPipeline::from_config(config),
            averager: OutlierRobustAverager::new(config.outlier_threshold),
            solver: CalibrationSolver::new(config.emitter_count),
            reference_points: config.calibration.reference_points.clone(),
            averaging_period: config.averaging_period,
            max_cycle_failures: config.calibration.max_cycle_failures,
            schedule: CalibrationSchedule::from_config(config),
            log_level: config.log_level,
        }
    }

    pub fn with_schedule(mut self, schedule: CalibrationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Run calibration until a full pass succeeds, then solve
    ///
    /// Pass failures restart from the first reference point after a
    /// fixed delay; a singular system is fatal and returned as-is.
    pub fn run(
        &self,
        sampler: &mut dyn SamplerInterface,
        display: &mut dyn DisplayInterface,
    ) -> Result<CalibrationModel, CalibrationError> {
        display.write_line(DisplayLine::Top, "Calibration!")?;
        display.write_line(DisplayLine::Bottom, "Prepare the rec.")?;
        if self.log_level >= LogLevel::Info {
            println!("beginning calibration over {} reference points", self.reference_points.len());
        }
        std::thread::sleep(self.schedule.restart_delay);

        loop {
            match self.run_pass(sampler, display) {
                Ok(samples) => return self.solver.solve(&samples),
                Err(CalibrationError::ReferencePointFailed { point, attempts }) => {
                    display.write_line(DisplayLine::Top, "Invalid")?;
                    display.write_line(DisplayLine::Bottom, "calibration")?;
                    if self.log_level >= LogLevel::Warn {
                        eprintln!(
                            "calibration point {} failed after {} invalid cycles, restarting pass",
                            point + 1,
                            attempts
                        );
                    }
                    std::thread::sleep(self.schedule.restart_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One complete pass over every reference point
    fn run_pass(
        &self,
        sampler: &mut dyn SamplerInterface,
        display: &mut dyn DisplayInterface,
    ) -> Result<Vec<CalibrationSample>, CalibrationError> {
        let total = self.reference_points.len();
        let mut samples = Vec::with_capacity(total);

        for (index, point) in self.reference_points.iter().enumerate() {
            display.write_line(DisplayLine::Top, &format!("[{}, {}]", point.x, point.y))?;
            for elapsed in 0..=self.schedule.countdown_secs {
                let remaining = self.schedule.countdown_secs - elapsed;
                display.write_line(
                    DisplayLine::Bottom,
                    &format!("{}/{}, {}sec", index + 1, total, remaining),
                )?;
                std::thread::sleep(self.schedule.tick);
            }

            let intensities = self.measure_point(sampler, index)?;
            samples.push(CalibrationSample {
                reference: *point,
                intensities,
            });
            if self.log_level >= LogLevel::Debug {
                println!(
                    "calibration point {}: {:?}",
                    index + 1,
                    samples[index].intensities.values
                );
            }
        }

        Ok(samples)
    }

    /// Fill one averaging window at a reference point and stabilize it
    fn measure_point(
        &self,
        sampler: &mut dyn SamplerInterface,
        point: usize,
    ) -> Result<crate::core::IntensityVector, CalibrationError> {
        let mut window = AveragingWindow::new(self.averaging_period);
        let mut failures = 0;

        while !window.is_full() {
            match self.pipeline.measure_cycle(sampler) {
                Ok(vector) => window.push(vector),
                Err(CycleError::Hardware(e)) => return Err(e.into()),
                Err(CycleError::Segmentation(reason)) => {
                    failures += 1;
                    window.reset();
                    if self.log_level >= LogLevel::Debug {
                        println!("calibration cycle rejected: {}", reason);
                    }
                    if failures > self.max_cycle_failures {
                        return Err(CalibrationError::ReferencePointFailed {
                            point,
                            attempts: failures,
                        });
                    }
                }
            }
        }

        Ok(self.averager.stabilize(&window))
    }
}
