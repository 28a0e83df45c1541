//! Outlier-robust averaging across measurement cycles
//!
//! Transient misreads (reflections, brief occlusion) show up as values
//! far from the rest of the window. Filtering against the median
//! rejects them without assuming any particular noise model.

use crate::core::IntensityVector;

/// Window of intensity vectors collected over consecutive valid cycles
///
/// Session-scoped within one averaging pass; reset to empty whenever a
/// cycle fails validation so a stabilized reading never mixes data
/// from before and after a disturbance.
#[derive(Debug, Clone)]
pub struct AveragingWindow {
    period: usize,
    rows: Vec<IntensityVector>,
}

impl AveragingWindow {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            rows: Vec::with_capacity(period),
        }
    }

    pub fn push(&mut self, vector: IntensityVector) {
        self.rows.push(vector);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.period
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// All window values for one emitter, in cycle order
    pub fn channel_values(&self, emitter: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.values[emitter]).collect()
    }

    pub fn emitter_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.emitter_count())
    }
}

/// Median-filtered mean over an averaging window
#[derive(Debug, Clone)]
pub struct OutlierRobustAverager {
    outlier_threshold: f64,
}

impl OutlierRobustAverager {
    pub fn new(outlier_threshold: f64) -> Self {
        Self { outlier_threshold }
    }

    /// Stabilize one emitter's window of values
    ///
    /// Values beyond the threshold distance from the window median are
    /// discarded; the rest average into a value rounded to the nearest
    /// integer. An empty retained set yields exactly 0, which
    /// downstream reads as "no reliable value", never as a valid zero.
    pub fn stabilize_channel(&self, window: &[f64]) -> f64 {
        let median = match median(window) {
            Some(m) => m,
            None => return 0.0,
        };

        let retained: Vec<f64> = window
            .iter()
            .copied()
            .filter(|v| (v - median).abs() < self.outlier_threshold)
            .collect();
        if retained.is_empty() {
            return 0.0;
        }

        let mean = retained.iter().sum::<f64>() / retained.len() as f64;
        mean.round()
    }

    /// Stabilize a full window into one intensity vector
    pub fn stabilize(&self, window: &AveragingWindow) -> IntensityVector {
        let values = (0..window.emitter_count())
            .map(|emitter| self.stabilize_channel(&window.channel_values(emitter)))
            .collect();
        IntensityVector::new(values)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("intensities are finite"));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spike_is_discarded() {
        let averager = OutlierRobustAverager::new(20.0);
        // Median 51; 200 is dropped, the rest average to 50.5.
        let result = averager.stabilize_channel(&[50.0, 52.0, 51.0, 200.0, 49.0]);
        assert_eq!(result, 51.0);
    }

    #[test]
    fn test_every_retained_value_is_near_median() {
        let averager = OutlierRobustAverager::new(20.0);
        let window = [10.0, 500.0, 12.0, 11.0, -300.0, 9.0, 13.0];
        let m = median(&window).unwrap();
        let retained: Vec<f64> = window
            .iter()
            .copied()
            .filter(|v| (v - m).abs() < 20.0)
            .collect();
        assert!(retained.iter().all(|v| (v - m).abs() < 20.0));
        assert_eq!(averager.stabilize_channel(&window), 11.0);
    }

    #[test]
    fn test_degenerate_window_yields_zero() {
        let averager = OutlierRobustAverager::new(0.0);
        // Zero threshold filters everything out.
        assert_eq!(averager.stabilize_channel(&[40.0, 41.0, 42.0]), 0.0);
    }

    #[test]
    fn test_empty_window_yields_zero() {
        let averager = OutlierRobustAverager::new(20.0);
        assert_eq!(averager.stabilize_channel(&[]), 0.0);
    }

    #[test]
    fn test_single_value_window() {
        let averager = OutlierRobustAverager::new(20.0);
        assert_eq!(averager.stabilize_channel(&[37.0]), 37.0);
    }

    #[test]
    fn test_even_window_uses_middle_pair_median() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
    }

    #[test]
    fn test_stabilize_runs_per_emitter() {
        let mut window = AveragingWindow::new(3);
        window.push(IntensityVector::new(vec![100.0, 50.0]));
        window.push(IntensityVector::new(vec![102.0, 300.0]));
        window.push(IntensityVector::new(vec![101.0, 52.0]));
        assert!(window.is_full());

        let stabilized = OutlierRobustAverager::new(20.0).stabilize(&window);
        assert_eq!(stabilized.values, vec![101.0, 51.0]);
    }

    #[test]
    fn test_window_reset_empties_it() {
        let mut window = AveragingWindow::new(2);
        window.push(IntensityVector::new(vec![1.0]));
        window.reset();
        assert!(window.is_empty());
        assert!(!window.is_full());
    }
}
