//! Per-emitter intensity extraction
//!
//! Sections come in pairs of boundaries: each pulse plateau sits
//! between its rise and fall edges, with the skipped in-between ranges
//! covering the off gaps. The first aligned section is the zero-level
//! reference; its average is subtracted from every emitter section in
//! the same cycle.

use crate::core::IntensityVector;
use crate::processing::{SectionBoundaries, SegmentationError, WaveformBuffer};

/// Reduces an aligned cycle to one baseline-corrected value per emitter
///
/// All-or-nothing: either every emitter section is in range and a full
/// vector comes back, or the cycle is rejected and nothing is emitted.
/// Section averages use floating-point division throughout so no
/// systematic truncation bias reaches the calibration solve.
#[derive(Debug, Clone)]
pub struct IntensityExtractor {
    emitter_count: usize,
}

impl IntensityExtractor {
    pub fn new(emitter_count: usize) -> Self {
        Self { emitter_count }
    }

    pub fn extract(
        &self,
        buffer: &WaveformBuffer,
        boundaries: &SectionBoundaries,
        start_section: usize,
    ) -> Result<IntensityVector, SegmentationError> {
        // Sections 0..=K, two boundaries apart; the last index touched
        // is start + 2K + 1.
        let last_boundary = start_section + 2 * self.emitter_count + 1;
        if last_boundary >= boundaries.len() {
            return Err(SegmentationError::CycleOutOfRange {
                start_section,
                boundary_count: boundaries.len(),
            });
        }

        let zero_level = self.section_average(buffer, boundaries, start_section, 0)?;

        let mut values = Vec::with_capacity(self.emitter_count);
        for emitter in 1..=self.emitter_count {
            let average = self.section_average(buffer, boundaries, start_section, emitter)?;
            values.push(average - zero_level);
        }

        Ok(IntensityVector::new(values))
    }

    fn section_average(
        &self,
        buffer: &WaveformBuffer,
        boundaries: &SectionBoundaries,
        start_section: usize,
        section: usize,
    ) -> Result<f64, SegmentationError> {
        let start = boundaries.get(start_section + 2 * section);
        let end = boundaries.get(start_section + 2 * section + 1);
        if end <= start {
            return Err(SegmentationError::EmptySection { section });
        }
        Ok(buffer.average(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SyntheticWaveform;
    use crate::processing::{EdgeSegmenter, SectionSelector};

    fn aligned_cycle(intensities: &[u16]) -> (WaveformBuffer, SectionBoundaries, usize) {
        let buffer = WaveformBuffer::from_samples(SyntheticWaveform::new(intensities).repeated(2));
        let boundaries = EdgeSegmenter::new(50, 16).segment(&buffer);
        let start = SectionSelector::new(intensities.len())
            .select(&boundaries)
            .unwrap();
        (buffer, boundaries, start)
    }

    #[test]
    fn test_extracts_baseline_corrected_intensities() {
        let (buffer, boundaries, start) = aligned_cycle(&[100, 50, 30]);
        let extractor = IntensityExtractor::new(3);
        let vector = extractor.extract(&buffer, &boundaries, start).unwrap();
        assert_eq!(vector.values, vec![100.0, 50.0, 30.0]);
    }

    #[test]
    fn test_vector_always_has_one_entry_per_emitter() {
        let (buffer, boundaries, start) = aligned_cycle(&[70, 90, 120]);
        let vector = IntensityExtractor::new(3)
            .extract(&buffer, &boundaries, start)
            .unwrap();
        assert_eq!(vector.emitter_count(), 3);
    }

    #[test]
    fn test_zero_level_subtracts_to_zero_against_itself() {
        // An emitter pulse at exactly the baseline level must read 0.
        let (buffer, boundaries, start) = aligned_cycle(&[0, 50, 30]);
        let vector = IntensityExtractor::new(3)
            .extract(&buffer, &boundaries, start)
            .unwrap();
        assert_eq!(vector.values[0], 0.0);
    }

    #[test]
    fn test_rejects_cycle_past_recorded_boundaries() {
        let (buffer, boundaries, _) = aligned_cycle(&[100, 50, 30]);
        let extractor = IntensityExtractor::new(3);
        let result = extractor.extract(&buffer, &boundaries, 10);
        assert!(matches!(
            result,
            Err(SegmentationError::CycleOutOfRange {
                start_section: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_fractional_average_is_not_truncated() {
        let buffer = WaveformBuffer::from_samples(vec![10, 11, 10, 11]);
        assert_eq!(buffer.average(0, 4), 10.5);
    }
}
