//! Signal processing pipeline: capture, segmentation, extraction, averaging
//!
//! Data flows strictly forward through per-cycle value objects: a
//! captured buffer is segmented into sections, sections are reduced to
//! one baseline-corrected intensity per emitter, and repeated cycles
//! are stabilized by an outlier-robust average.

pub mod averaging;
pub mod capture;
pub mod extraction;
pub mod pipeline;
pub mod segmentation;

pub use averaging::{AveragingWindow, OutlierRobustAverager};
pub use capture::{WaveformBuffer, WaveformCapture};
pub use extraction::IntensityExtractor;
pub use pipeline::{CycleError, MeasurementPipeline};
pub use segmentation::{EdgeSegmenter, SectionBoundaries, SectionSelector, SegmentationError};
