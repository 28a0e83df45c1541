//! Mock hardware implementations for testing and development

use crate::hardware::display::fit_line;
use crate::hardware::{
    DisplayInterface, DisplayLine, GpioInterface, HwError, HwResult, PinMode, SamplerInterface,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::collections::{HashMap, VecDeque};

/// Highest channel the mock converter accepts
const CHANNEL_LIMIT: u8 = 7;
/// Ceiling of the mock converter's output range (10-bit reading halved)
const SAMPLE_CEILING: f64 = 511.0;

/// Builder for plateau-structured test waveforms
///
/// Produces one modulation period: a zero-level pulse, one pulse per
/// emitter separated by short off gaps, then the inter-cycle idle
/// stretch. The period is rotated to start inside the zero plateau so
/// that captures aligned to the period boundary always see the idle
/// gap within the first few section edges.
#[derive(Debug, Clone)]
pub struct SyntheticWaveform {
    /// Signal level while every emitter is off
    pub base_level: u16,
    /// Signal level of the baseline reference pulse
    pub zero_level: u16,
    /// Per-emitter intensity above the baseline pulse
    pub intensities: Vec<u16>,
    /// Samples per pulse plateau
    pub plateau_len: usize,
    /// Samples between consecutive pulses
    pub gap_len: usize,
    /// Samples of dead time between repeating cycles
    pub idle_len: usize,
}

impl SyntheticWaveform {
    /// Waveform with the default geometry: a 100-sample period, so two
    /// full periods fill one 200-sample capture exactly
    pub fn new(intensities: &[u16]) -> Self {
        Self {
            base_level: 10,
            zero_level: 80,
            intensities: intensities.to_vec(),
            plateau_len: 12,
            gap_len: 5,
            idle_len: 37,
        }
    }

    /// One full period of samples
    pub fn build(&self) -> Vec<u16> {
        let mut period = Vec::new();
        period.extend(std::iter::repeat(self.zero_level).take(self.plateau_len));
        for &intensity in &self.intensities {
            period.extend(std::iter::repeat(self.base_level).take(self.gap_len));
            period.extend(std::iter::repeat(self.zero_level + intensity).take(self.plateau_len));
        }
        period.extend(std::iter::repeat(self.base_level).take(self.idle_len));
        period.rotate_left(self.plateau_len / 2);
        period
    }

    /// The period repeated back to back
    pub fn repeated(&self, periods: usize) -> Vec<u16> {
        let one = self.build();
        let mut out = Vec::with_capacity(one.len() * periods);
        for _ in 0..periods {
            out.extend_from_slice(&one);
        }
        out
    }
}

/// A featureless stretch of samples (no detectable edges)
pub fn flat_waveform(len: usize, level: u16) -> Vec<u16> {
    vec![level; len]
}

/// Mock sampler replaying programmed waveforms
///
/// Segments play once each, in order; the final segment repeats
/// forever. Optional Gaussian noise is seeded so tests stay
/// deterministic.
pub struct MockSampler {
    segments: VecDeque<Vec<u16>>,
    current: Vec<u16>,
    cursor: usize,
    reads: u64,
    noise: Option<(Normal<f64>, StdRng)>,
}

impl MockSampler {
    /// Sampler that replays one waveform cyclically
    pub fn from_waveform(waveform: Vec<u16>) -> Self {
        Self::from_segments(vec![waveform])
    }

    /// Sampler that plays each segment once, then repeats the last
    pub fn from_segments(segments: Vec<Vec<u16>>) -> Self {
        let mut queue: VecDeque<Vec<u16>> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        let current = queue.pop_front().unwrap_or_else(|| vec![0]);
        Self {
            segments: queue,
            current,
            cursor: 0,
            reads: 0,
            noise: None,
        }
    }

    /// Add seeded Gaussian noise to every sample
    pub fn with_noise(mut self, std_dev: f64, seed: u64) -> Self {
        let normal = Normal::new(0.0, std_dev).expect("std_dev must be finite and non-negative");
        self.noise = Some((normal, StdRng::seed_from_u64(seed)));
        self
    }

    /// Total number of samples served so far
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl SamplerInterface for MockSampler {
    fn read(&mut self, channel: u8) -> HwResult<u16> {
        if channel > CHANNEL_LIMIT {
            return Err(HwError::InvalidChannel {
                channel,
                limit: CHANNEL_LIMIT,
            });
        }

        let mut value = self.current[self.cursor] as f64;
        if let Some((normal, rng)) = &mut self.noise {
            value += normal.sample(rng);
        }

        self.cursor += 1;
        if self.cursor >= self.current.len() {
            self.cursor = 0;
            if let Some(next) = self.segments.pop_front() {
                self.current = next;
            }
        }
        self.reads += 1;

        Ok(value.clamp(0.0, SAMPLE_CEILING).round() as u16)
    }
}

/// Mock display recording everything written to it
pub struct MockDisplay {
    lines: [String; 2],
    history: Vec<(DisplayLine, String)>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            lines: [fit_line(""), fit_line("")],
            history: Vec::new(),
        }
    }

    /// Current content of one line, trailing padding removed
    pub fn line(&self, line: DisplayLine) -> &str {
        let idx = match line {
            DisplayLine::Top => 0,
            DisplayLine::Bottom => 1,
        };
        self.lines[idx].trim_end()
    }

    pub fn history(&self) -> &[(DisplayLine, String)] {
        &self.history
    }

    /// Whether any write so far contained the given text
    pub fn saw_text(&self, needle: &str) -> bool {
        self.history.iter().any(|(_, text)| text.contains(needle))
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayInterface for MockDisplay {
    fn write_line(&mut self, line: DisplayLine, text: &str) -> HwResult<()> {
        let fitted = fit_line(text);
        let idx = match line {
            DisplayLine::Top => 0,
            DisplayLine::Bottom => 1,
        };
        self.lines[idx] = fitted.clone();
        self.history.push((line, fitted));
        Ok(())
    }

    fn clear(&mut self) -> HwResult<()> {
        self.lines = [fit_line(""), fit_line("")];
        Ok(())
    }
}

/// Mock GPIO backend with scripted inputs and a write log
pub struct MockGpio {
    modes: HashMap<u8, PinMode>,
    levels: HashMap<u8, bool>,
    scripted: HashMap<u8, VecDeque<bool>>,
    write_log: Vec<(u8, bool)>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            levels: HashMap::new(),
            scripted: HashMap::new(),
            write_log: Vec::new(),
        }
    }

    /// Queue the bits an input pin will return, in read order
    pub fn script_input(&mut self, pin: u8, bits: Vec<bool>) {
        self.scripted.entry(pin).or_default().extend(bits);
    }

    /// Last written level of a pin (false if never written)
    pub fn level(&self, pin: u8) -> bool {
        self.levels.get(&pin).copied().unwrap_or(false)
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    /// Every (pin, level) write in order
    pub fn write_log(&self) -> &[(u8, bool)] {
        &self.write_log
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for MockGpio {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) {
        self.modes.insert(pin, mode);
    }

    fn digital_write(&mut self, pin: u8, level: bool) {
        self.levels.insert(pin, level);
        self.write_log.push((pin, level));
    }

    fn digital_read(&mut self, pin: u8) -> bool {
        if let Some(queue) = self.scripted.get_mut(&pin) {
            if let Some(bit) = queue.pop_front() {
                return bit;
            }
        }
        self.level(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_waveform_period_length() {
        let waveform = SyntheticWaveform::new(&[100, 50, 30]).build();
        // 4 plateaus of 12, 3 gaps of 5, idle of 37
        assert_eq!(waveform.len(), 100);
    }

    #[test]
    fn test_synthetic_waveform_starts_inside_zero_plateau() {
        let shape = SyntheticWaveform::new(&[100, 50, 30]);
        let waveform = shape.build();
        assert_eq!(waveform[0], shape.zero_level);
        // The other half of the zero plateau wraps to the end.
        assert_eq!(*waveform.last().unwrap(), shape.zero_level);
    }

    #[test]
    fn test_sampler_cycles_last_segment() {
        let mut sampler = MockSampler::from_segments(vec![vec![1, 2], vec![7, 8, 9]]);
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(sampler.read(0).unwrap());
        }
        assert_eq!(seen, vec![1, 2, 7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_sampler_rejects_bad_channel() {
        let mut sampler = MockSampler::from_waveform(vec![1]);
        assert!(matches!(
            sampler.read(9),
            Err(HwError::InvalidChannel { channel: 9, .. })
        ));
    }

    #[test]
    fn test_sampler_noise_is_deterministic() {
        let waveform = vec![100; 32];
        let mut a = MockSampler::from_waveform(waveform.clone()).with_noise(3.0, 42);
        let mut b = MockSampler::from_waveform(waveform).with_noise(3.0, 42);
        for _ in 0..32 {
            assert_eq!(a.read(0).unwrap(), b.read(0).unwrap());
        }
    }

    #[test]
    fn test_display_records_history() {
        let mut display = MockDisplay::new();
        display.write_line(DisplayLine::Top, "Calibration!").unwrap();
        display.write_line(DisplayLine::Bottom, "Prepare the rec.").unwrap();

        assert_eq!(display.line(DisplayLine::Top), "Calibration!");
        assert_eq!(display.line(DisplayLine::Bottom), "Prepare the rec.");
        assert!(display.saw_text("Calibration!"));
        assert!(!display.saw_text("Unsteady"));
    }

    #[test]
    fn test_gpio_scripted_reads_then_level() {
        let mut gpio = MockGpio::new();
        gpio.script_input(10, vec![true, false]);
        assert!(gpio.digital_read(10));
        assert!(!gpio.digital_read(10));
        // Script exhausted, falls back to last written level.
        gpio.digital_write(10, true);
        assert!(gpio.digital_read(10));
    }
}
