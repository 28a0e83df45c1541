//! Photometric 2D Positioning System
//!
//! Estimates the planar position of a mobile receiver from the relative
//! intensity of light arriving from fixed directional emitters,
//! time-multiplexed onto a single sampled waveform. The pipeline
//! segments each captured waveform into per-emitter sections, removes
//! outliers and baseline offset, and inverts a quadratic calibration
//! model fitted at known reference positions.

pub mod calibration;
pub mod core;
pub mod hardware;
pub mod processing;
pub mod tracking;
pub mod utils;

// Re-export commonly used types
pub use calibration::{CalibrationModel, CalibrationRoutine, CalibrationSchedule};
pub use core::{IntensityVector, Position, ReferencePoint};
pub use hardware::{
    ConsoleDisplay, DisplayInterface, DisplayLine, GpioInterface, Hd44780Display, HwError,
    HwResult, MockDisplay, MockGpio, MockSampler, SamplerInterface, SpiAdcSampler,
    SyntheticWaveform,
};
pub use processing::{
    AveragingWindow, EdgeSegmenter, IntensityExtractor, MeasurementPipeline,
    OutlierRobustAverager, SectionSelector, WaveformCapture,
};
pub use tracking::{PositionEstimator, PositionTracker, TrackingOutcome};
pub use utils::{LogLevel, SystemConfig};
