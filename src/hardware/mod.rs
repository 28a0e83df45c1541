//! Hardware abstraction layer for the sampling channel and the display
//!
//! This module isolates the two blocking collaborators of the pipeline
//! (the analog sampler and the 2x16 character display) behind traits so
//! the segmentation, calibration, and estimation logic can run against
//! synthetic waveforms.

pub mod adc;
pub mod display;
pub mod error;
pub mod gpio;
pub mod lcd;
pub mod mock;
pub mod sampler;

pub use adc::{SpiAdcPins, SpiAdcSampler};
pub use display::{ConsoleDisplay, DisplayInterface, DisplayLine};
pub use error::{HwError, HwResult};
pub use gpio::{GpioInterface, PinMode};
pub use lcd::{Hd44780Display, LcdPins};
pub use mock::{flat_waveform, MockDisplay, MockGpio, MockSampler, SyntheticWaveform};
pub use sampler::SamplerInterface;
