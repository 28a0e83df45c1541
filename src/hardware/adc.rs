//! Bit-banged SPI driver for the MCP3008-class analog converter

use crate::hardware::{GpioInterface, HwError, HwResult, PinMode, SamplerInterface};

/// Highest channel number accepted by the converter
const CHANNEL_LIMIT: u8 = 7;

/// Pin assignment for the software SPI bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiAdcPins {
    pub clock: u8,
    pub mosi: u8,
    pub miso: u8,
    pub chip_select: u8,
}

impl SpiAdcPins {
    fn validate(&self) -> HwResult<()> {
        let pins = [self.clock, self.mosi, self.miso, self.chip_select];
        for i in 0..pins.len() {
            for j in (i + 1)..pins.len() {
                if pins[i] == pins[j] {
                    return Err(HwError::ConfigurationError {
                        parameter: "spi_pins".to_string(),
                        value: format!("pin {} assigned twice", pins[i]),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sampler backed by a bit-banged SPI analog-to-digital converter
///
/// Clocks a 5-bit command word out (start bit, single-ended bit, three
/// channel bits), then clocks twelve bits back in: one empty bit, one
/// null bit, and ten conversion bits. The assembled word is halved
/// into the working sample range.
pub struct SpiAdcSampler<G: GpioInterface> {
    gpio: G,
    pins: SpiAdcPins,
}

impl<G: GpioInterface> SpiAdcSampler<G> {
    pub fn new(mut gpio: G, pins: SpiAdcPins) -> HwResult<Self> {
        pins.validate()?;

        gpio.pin_mode(pins.clock, PinMode::Output);
        gpio.pin_mode(pins.mosi, PinMode::Output);
        gpio.pin_mode(pins.miso, PinMode::Input);
        gpio.pin_mode(pins.chip_select, PinMode::Output);
        gpio.digital_write(pins.chip_select, true);

        Ok(Self { gpio, pins })
    }

    fn clock_pulse(&mut self) {
        self.gpio.digital_write(self.pins.clock, true);
        self.gpio.digital_write(self.pins.clock, false);
    }

    /// Borrow the underlying GPIO backend (used by driver tests)
    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

impl<G: GpioInterface> SamplerInterface for SpiAdcSampler<G> {
    fn read(&mut self, channel: u8) -> HwResult<u16> {
        if channel > CHANNEL_LIMIT {
            return Err(HwError::InvalidChannel {
                channel,
                limit: CHANNEL_LIMIT,
            });
        }

        self.gpio.digital_write(self.pins.chip_select, true);
        self.gpio.digital_write(self.pins.clock, false);
        self.gpio.digital_write(self.pins.chip_select, false);

        // Start bit + single-ended bit ahead of the channel number,
        // left-aligned so only five bits go out on the wire.
        let mut command = (channel | 0x18) << 3;
        for _ in 0..5 {
            self.gpio.digital_write(self.pins.mosi, command & 0x80 != 0);
            command <<= 1;
            self.clock_pulse();
        }

        // One empty bit, one null bit, then ten conversion bits.
        let mut value: u16 = 0;
        for _ in 0..12 {
            self.clock_pulse();
            value <<= 1;
            if self.gpio.digital_read(self.pins.miso) {
                value |= 0x1;
            }
        }

        self.gpio.digital_write(self.pins.chip_select, true);

        Ok(value >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::MockGpio;

    const PINS: SpiAdcPins = SpiAdcPins {
        clock: 11,
        mosi: 6,
        miso: 10,
        chip_select: 5,
    };

    fn scripted_bits(word: u16) -> Vec<bool> {
        (0..12).rev().map(|i| word & (1 << i) != 0).collect()
    }

    #[test]
    fn test_rejects_out_of_range_channel() {
        let mut adc = SpiAdcSampler::new(MockGpio::new(), PINS).unwrap();
        let result = adc.read(8);
        assert!(matches!(result, Err(HwError::InvalidChannel { channel: 8, .. })));
    }

    #[test]
    fn test_rejects_duplicate_pins() {
        let pins = SpiAdcPins {
            clock: 4,
            mosi: 4,
            miso: 10,
            chip_select: 5,
        };
        assert!(SpiAdcSampler::new(MockGpio::new(), pins).is_err());
    }

    #[test]
    fn test_decodes_scripted_conversion() {
        let mut gpio = MockGpio::new();
        // The last clocked bit is dropped by the final halving.
        gpio.script_input(PINS.miso, scripted_bits(0x155 << 1));
        let mut adc = SpiAdcSampler::new(gpio, PINS).unwrap();

        assert_eq!(adc.read(0).unwrap(), 0x155);
    }

    #[test]
    fn test_command_bits_for_channel_zero() {
        let mut adc = SpiAdcSampler::new(MockGpio::new(), PINS).unwrap();
        adc.read(0).unwrap();

        // (0 | 0x18) << 3 = 0xC0: five command bits 1,1,0,0,0
        let sent: Vec<bool> = adc
            .gpio()
            .write_log()
            .iter()
            .filter(|(pin, _)| *pin == PINS.mosi)
            .map(|(_, level)| *level)
            .collect();
        assert_eq!(sent, vec![true, true, false, false, false]);
    }

    #[test]
    fn test_chip_select_released_after_read() {
        let mut adc = SpiAdcSampler::new(MockGpio::new(), PINS).unwrap();
        adc.read(3).unwrap();
        assert!(adc.gpio().level(PINS.chip_select));
    }
}
