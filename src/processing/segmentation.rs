//! Edge detection and modulation-cycle alignment
//!
//! The waveform is a square-wave-like train of plateaus: one pulse per
//! emitter plus a baseline pulse, repeating after a wider idle gap. A
//! fixed amplitude threshold finds the plateau transitions without any
//! synchronization signal; the idle gap, being systematically wider
//! than any intra-cycle interval, anchors where a cycle starts.

use crate::processing::WaveformBuffer;
use std::fmt;

/// Reasons a cycle's section structure was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// The scan ran out of samples before filling the boundary list;
    /// the waveform carried too few edges for even one full cycle
    IncompleteScan { found: usize, capacity: usize },
    /// Boundary list too short to hold the selector's search window
    TooFewBoundaries { found: usize, required: usize },
    /// The aligned cycle's sections extend past the recorded boundaries
    CycleOutOfRange {
        start_section: usize,
        boundary_count: usize,
    },
    /// Adjacent boundaries collapsed onto the same sample index
    EmptySection { section: usize },
}

impl fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationError::IncompleteScan { found, capacity } => {
                write!(
                    f,
                    "insufficient segmentation: {} of {} boundaries found",
                    found, capacity
                )
            }
            SegmentationError::TooFewBoundaries { found, required } => {
                write!(
                    f,
                    "insufficient segmentation: {} boundaries, selector needs {}",
                    found, required
                )
            }
            SegmentationError::CycleOutOfRange {
                start_section,
                boundary_count,
            } => {
                write!(
                    f,
                    "cycle starting at section {} exceeds {} recorded boundaries",
                    start_section, boundary_count
                )
            }
            SegmentationError::EmptySection { section } => {
                write!(f, "section {} is empty", section)
            }
        }
    }
}

impl std::error::Error for SegmentationError {}

/// Ordered sample indices of detected plateau transitions
///
/// Bounded: the scan stops once the configured capacity is reached,
/// and that stop is the signal that the buffer held a full cycle's
/// worth of structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBoundaries {
    indices: Vec<usize>,
    capacity: usize,
    capacity_reached: bool,
}

impl SectionBoundaries {
    #[cfg(test)]
    pub(crate) fn from_indices(indices: Vec<usize>, capacity: usize, capacity_reached: bool) -> Self {
        Self {
            indices,
            capacity,
            capacity_reached,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, i: usize) -> usize {
        self.indices[i]
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the scan filled the boundary list before running out of
    /// samples — the "sufficient structure" signal
    pub fn is_complete(&self) -> bool {
        self.capacity_reached
    }
}

/// Detects section boundaries from sample-to-sample jumps
#[derive(Debug, Clone)]
pub struct EdgeSegmenter {
    threshold: i32,
    max_boundaries: usize,
}

impl EdgeSegmenter {
    pub fn new(threshold: i32, max_boundaries: usize) -> Self {
        Self {
            threshold,
            max_boundaries,
        }
    }

    /// Scan the buffer for jumps larger than the threshold
    ///
    /// Pure function of its inputs: a fixed buffer always yields the
    /// same boundary sequence. The scan stops early once the boundary
    /// list is full.
    pub fn segment(&self, buffer: &WaveformBuffer) -> SectionBoundaries {
        let samples = buffer.samples();
        let mut indices = Vec::with_capacity(self.max_boundaries);
        let mut capacity_reached = false;

        for i in 0..samples.len().saturating_sub(1) {
            let jump = (samples[i + 1] as i32 - samples[i] as i32).abs();
            if jump > self.threshold {
                indices.push(i + 1);
                if indices.len() >= self.max_boundaries {
                    capacity_reached = true;
                    break;
                }
            }
        }

        SectionBoundaries {
            indices,
            capacity: self.max_boundaries,
            capacity_reached,
        }
    }
}

/// Aligns the section list to the start of one modulation cycle
#[derive(Debug, Clone)]
pub struct SectionSelector {
    emitter_count: usize,
}

impl SectionSelector {
    pub fn new(emitter_count: usize) -> Self {
        Self { emitter_count }
    }

    /// Boundaries the selector inspects when hunting the idle gap
    pub fn search_window(&self) -> usize {
        2 * self.emitter_count + 2
    }

    /// Find the boundary index that starts a full cycle
    ///
    /// Inspects the first `2K+2` boundaries and picks the adjacent pair
    /// with the widest index gap; that gap is the inter-cycle idle
    /// stretch, so the boundary right after it opens the cycle. Ties go
    /// to the earliest pair.
    pub fn select(&self, boundaries: &SectionBoundaries) -> Result<usize, SegmentationError> {
        if !boundaries.is_complete() {
            return Err(SegmentationError::IncompleteScan {
                found: boundaries.len(),
                capacity: boundaries.capacity(),
            });
        }

        let window = self.search_window();
        if boundaries.len() < window {
            return Err(SegmentationError::TooFewBoundaries {
                found: boundaries.len(),
                required: window,
            });
        }

        let mut max_gap = 0;
        let mut start_section = 0;
        for i in 0..window - 1 {
            let gap = boundaries.get(i + 1) - boundaries.get(i);
            if gap > max_gap {
                max_gap = gap;
                start_section = i + 1;
            }
        }

        Ok(start_section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SyntheticWaveform;

    fn plateau_buffer() -> WaveformBuffer {
        WaveformBuffer::from_samples(vec![
            0, 0, 0, 100, 100, 100, 0, 0, 0, 50, 50, 50, 0, 0, 0, 30, 30, 30, 0, 0, 0,
        ])
    }

    #[test]
    fn test_boundaries_at_plateau_changes() {
        let segmenter = EdgeSegmenter::new(20, 16);
        let boundaries = segmenter.segment(&plateau_buffer());
        assert_eq!(boundaries.indices(), &[3, 6, 9, 12, 15, 18]);
        assert!(!boundaries.is_complete());
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let segmenter = EdgeSegmenter::new(20, 16);
        let first = segmenter.segment(&plateau_buffer());
        let second = segmenter.segment(&plateau_buffer());
        assert_eq!(first, second);
    }

    #[test]
    fn test_raising_threshold_never_adds_boundaries() {
        let buffer = plateau_buffer();
        let mut previous = usize::MAX;
        for threshold in [10, 25, 40, 60, 120] {
            let count = EdgeSegmenter::new(threshold, 16).segment(&buffer).len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn test_flat_buffer_finds_nothing() {
        let segmenter = EdgeSegmenter::new(20, 16);
        let boundaries = segmenter.segment(&WaveformBuffer::from_samples(vec![40; 64]));
        assert!(boundaries.is_empty());
        assert!(!boundaries.is_complete());
    }

    #[test]
    fn test_scan_stops_at_capacity() {
        // Alternating levels produce an edge at every step.
        let samples: Vec<u16> = (0..64).map(|i| if i % 2 == 0 { 0 } else { 200 }).collect();
        let segmenter = EdgeSegmenter::new(50, 12);
        let boundaries = segmenter.segment(&WaveformBuffer::from_samples(samples));
        assert_eq!(boundaries.len(), 12);
        assert!(boundaries.is_complete());
    }

    #[test]
    fn test_selector_rejects_incomplete_scan() {
        let selector = SectionSelector::new(3);
        let boundaries = SectionBoundaries::from_indices(vec![3, 6, 9], 16, false);
        assert!(matches!(
            selector.select(&boundaries),
            Err(SegmentationError::IncompleteScan { found: 3, .. })
        ));
    }

    #[test]
    fn test_selector_finds_idle_gap() {
        // Gaps: 5, 12, 5, 12, 5, 12, 37 -> widest before boundary 7.
        let indices = vec![6, 11, 23, 28, 40, 45, 57, 94, 106, 111, 123, 128, 140, 145, 157, 194];
        let boundaries = SectionBoundaries::from_indices(indices, 16, true);
        let selector = SectionSelector::new(3);
        assert_eq!(selector.select(&boundaries).unwrap(), 7);
    }

    #[test]
    fn test_selector_tie_break_takes_first_maximum() {
        let indices = vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110];
        let boundaries = SectionBoundaries::from_indices(indices, 12, true);
        let selector = SectionSelector::new(2);
        // Every gap equals 10; the first pair wins.
        assert_eq!(selector.select(&boundaries).unwrap(), 1);
    }

    #[test]
    fn test_synthetic_capture_reaches_capacity() {
        let waveform = SyntheticWaveform::new(&[100, 50, 30]).repeated(2);
        let buffer = WaveformBuffer::from_samples(waveform);
        let segmenter = EdgeSegmenter::new(50, 16);
        let boundaries = segmenter.segment(&buffer);
        assert!(boundaries.is_complete());

        let selector = SectionSelector::new(3);
        let start = selector.select(&boundaries).unwrap();
        assert_eq!(start, 7);
    }
}
