//! Single-cycle measurement pipeline
//!
//! Chains capture, segmentation, alignment, and extraction for one
//! cycle. Both calibration and live tracking run their cycles through
//! this one path so the two phases can never disagree on semantics.

use crate::core::IntensityVector;
use crate::hardware::{HwError, SamplerInterface};
use crate::processing::{
    EdgeSegmenter, IntensityExtractor, SectionSelector, SegmentationError, WaveformCapture,
};
use crate::utils::SystemConfig;
use std::fmt;

/// Why one measurement cycle produced no intensity vector
#[derive(Debug, Clone, PartialEq)]
pub enum CycleError {
    /// The sampler itself failed; not recoverable by retrying the cycle
    Hardware(HwError),
    /// The waveform lacked usable section structure; the cycle is
    /// discarded and the caller may simply try again
    Segmentation(SegmentationError),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::Hardware(e) => write!(f, "hardware failure: {}", e),
            CycleError::Segmentation(e) => write!(f, "invalid cycle: {}", e),
        }
    }
}

impl std::error::Error for CycleError {}

impl From<HwError> for CycleError {
    fn from(error: HwError) -> Self {
        CycleError::Hardware(error)
    }
}

impl From<SegmentationError> for CycleError {
    fn from(error: SegmentationError) -> Self {
        CycleError::Segmentation(error)
    }
}

/// Capture-to-intensity pipeline for one measurement cycle
pub struct MeasurementPipeline {
    capture: WaveformCapture,
    segmenter: EdgeSegmenter,
    selector: SectionSelector,
    extractor: IntensityExtractor,
}

impl MeasurementPipeline {
    pub fn new(
        capture: WaveformCapture,
        segmenter: EdgeSegmenter,
        selector: SectionSelector,
        extractor: IntensityExtractor,
    ) -> Self {
        Self {
            capture,
            segmenter,
            selector,
            extractor,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            capture: WaveformCapture::new(config.adc_channel, config.sample_buffer_len),
            segmenter: EdgeSegmenter::new(config.edge_threshold, config.max_boundaries),
            selector: SectionSelector::new(config.emitter_count),
            extractor: IntensityExtractor::new(config.emitter_count),
        }
    }

    /// Run one full cycle: capture a fresh buffer, segment it, align to
    /// the modulation cycle, and extract the intensity vector
    ///
    /// The buffer and boundary list live only inside this call; nothing
    /// from a previous cycle can alias into the next one.
    pub fn measure_cycle(
        &self,
        sampler: &mut dyn SamplerInterface,
    ) -> Result<IntensityVector, CycleError> {
        let buffer = self.capture.capture(sampler)?;
        let boundaries = self.segmenter.segment(&buffer);
        let start_section = self.selector.select(&boundaries)?;
        let vector = self.extractor.extract(&buffer, &boundaries, start_section)?;
        Ok(vector)
    }
}
