//! Live position tracking from stabilized intensity readings

pub mod estimator;
pub mod tracker;

pub use estimator::{Estimate, PositionEstimator};
pub use tracker::{PositionTracker, TrackerStats, TrackingOutcome};
