//! Sampler interface trait

use crate::hardware::HwResult;

/// Hardware abstraction for the analog sampling channel
///
/// One call returns one raw intensity-proportional sample. Calls block
/// until the conversion completes; channel range enforcement belongs to
/// the implementation, not to callers.
pub trait SamplerInterface {
    fn read(&mut self, channel: u8) -> HwResult<u16>;
}
