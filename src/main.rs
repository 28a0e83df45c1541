use photoloc::{
    CalibrationRoutine, ConsoleDisplay, MockSampler, PositionTracker, SyntheticWaveform,
    SystemConfig,
};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "photoloc.json";

/// Bench-run emitter intensities for one calibration target: a base
/// reading plus two extra brightness levels per emitter, which keeps
/// the calibration system non-singular.
fn bench_intensities(emitter_count: usize, point: usize) -> Vec<u16> {
    let base: Vec<u16> = (0..emitter_count).map(|e| 100 + 20 * e as u16).collect();
    if point == 0 {
        return base;
    }
    let emitter = (point - 1) / 2;
    let step = if (point - 1) % 2 == 0 { 60 } else { 120 };
    let mut row = base;
    row[emitter] += step;
    row
}

/// Synthetic sampler that walks through every calibration target in
/// order, then parks the receiver at the first one
fn bench_sampler(config: &SystemConfig) -> MockSampler {
    let reads_per_point = config.averaging_period * config.sample_buffer_len;
    let segments = (0..config.calibration.reference_points.len())
        .map(|point| {
            let waveform = SyntheticWaveform::new(&bench_intensities(config.emitter_count, point));
            let period = waveform.build().len();
            waveform.repeated(reads_per_point.div_ceil(period))
        })
        .collect();
    MockSampler::from_segments(segments)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        println!("loading configuration from {}", config_path);
        SystemConfig::from_file(&config_path)?
    } else {
        println!("no config file at {}, using defaults", config_path);
        SystemConfig::default()
    };
    config.validate()?;

    // Bench wiring: a synthetic sampler and the console standing in
    // for the ADC and the character LCD. Deployments on real hardware
    // wire SpiAdcSampler and Hd44780Display over their GPIO backend
    // instead.
    let mut sampler = bench_sampler(&config);
    let mut display = ConsoleDisplay::new();

    let model = CalibrationRoutine::new(&config).run(&mut sampler, &mut display)?;
    println!("calibration complete");

    let mut tracker = PositionTracker::new(&config, model, sampler, display);
    tracker.run()?;
    Ok(())
}
