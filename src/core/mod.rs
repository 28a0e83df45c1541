//! Core types and constants

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::{IntensityVector, Position, ReferencePoint};
