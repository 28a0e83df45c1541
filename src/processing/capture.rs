//! Waveform capture stage

use crate::hardware::{HwResult, SamplerInterface};

/// One cycle's worth of raw samples
///
/// Owned by the cycle that captured it; later stages borrow it and it
/// is dropped when the cycle ends, so stale sample data can never leak
/// into the next cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    samples: Vec<u16>,
}

impl WaveformBuffer {
    pub fn from_samples(samples: Vec<u16>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Mean of the half-open sample range [start, end)
    pub fn average(&self, start: usize, end: usize) -> f64 {
        let section = &self.samples[start..end];
        section.iter().map(|&s| s as f64).sum::<f64>() / section.len() as f64
    }
}

/// Fills a fixed-length buffer with sequential sampler reads
///
/// No transformation or validation happens here; every capture blocks
/// on the sampler one conversion at a time.
#[derive(Debug, Clone)]
pub struct WaveformCapture {
    channel: u8,
    buffer_len: usize,
}

impl WaveformCapture {
    pub fn new(channel: u8, buffer_len: usize) -> Self {
        Self {
            channel,
            buffer_len,
        }
    }

    pub fn capture(&self, sampler: &mut dyn SamplerInterface) -> HwResult<WaveformBuffer> {
        let mut samples = Vec::with_capacity(self.buffer_len);
        for _ in 0..self.buffer_len {
            samples.push(sampler.read(self.channel)?);
        }
        Ok(WaveformBuffer::from_samples(samples))
    }
}
