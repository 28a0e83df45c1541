//! System parameters taken from the reference hardware setup

/// Number of raw samples captured per measurement cycle
pub const SAMPLE_BUFFER_LEN: usize = 200;

/// Minimum sample-to-sample jump treated as a section edge
pub const EDGE_THRESHOLD: i32 = 50;

/// Maximum distance from the window median before a value is discarded
pub const OUTLIER_THRESHOLD: f64 = 20.0;

/// Number of valid cycles averaged into one stabilized reading
pub const AVERAGING_PERIOD: usize = 10;

/// Number of directional emitters multiplexed onto the waveform
pub const EMITTER_COUNT: usize = 3;

/// Capacity of the per-cycle section boundary list
pub const MAX_BOUNDARIES: usize = 16;

/// Characters per display line
pub const DISPLAY_WIDTH: usize = 16;
