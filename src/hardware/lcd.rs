//! HD44780 character LCD driver in 4-bit mode

use crate::hardware::display::fit_line;
use crate::hardware::{DisplayInterface, DisplayLine, GpioInterface, HwError, HwResult, PinMode};
use std::time::Duration;

/// DDRAM address of the first line
const LINE_1_ADDR: u8 = 0x80;
/// DDRAM address of the second line
const LINE_2_ADDR: u8 = 0xC0;

/// Enable pulse width
const E_PULSE: Duration = Duration::from_micros(50);
/// Settle time around the enable pulse
const E_DELAY: Duration = Duration::from_micros(50);

/// Register-select level for command bytes
const MODE_CMD: bool = false;
/// Register-select level for character bytes
const MODE_CHR: bool = true;

/// Pin assignment for the 4-bit data bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LcdPins {
    pub register_select: u8,
    pub enable: u8,
    pub data4: u8,
    pub data5: u8,
    pub data6: u8,
    pub data7: u8,
}

impl LcdPins {
    fn validate(&self) -> HwResult<()> {
        let pins = [
            self.register_select,
            self.enable,
            self.data4,
            self.data5,
            self.data6,
            self.data7,
        ];
        for i in 0..pins.len() {
            for j in (i + 1)..pins.len() {
                if pins[i] == pins[j] {
                    return Err(HwError::ConfigurationError {
                        parameter: "lcd_pins".to_string(),
                        value: format!("pin {} assigned twice", pins[i]),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Two-line character display driven over six GPIO pins
///
/// Bytes go out as two nibbles, each latched by an enable pulse. The
/// init sequence switches the controller into 4-bit mode, two-line
/// font, cursor off, entry mode increment, then clears.
pub struct Hd44780Display<G: GpioInterface> {
    gpio: G,
    pins: LcdPins,
}

impl<G: GpioInterface> Hd44780Display<G> {
    pub fn new(mut gpio: G, pins: LcdPins) -> HwResult<Self> {
        pins.validate()?;

        gpio.pin_mode(pins.register_select, PinMode::Output);
        gpio.pin_mode(pins.enable, PinMode::Output);
        gpio.pin_mode(pins.data4, PinMode::Output);
        gpio.pin_mode(pins.data5, PinMode::Output);
        gpio.pin_mode(pins.data6, PinMode::Output);
        gpio.pin_mode(pins.data7, PinMode::Output);

        let mut lcd = Self { gpio, pins };
        lcd.init();
        Ok(lcd)
    }

    fn init(&mut self) {
        for cmd in [0x33, 0x32, 0x28, 0x0C, 0x06, 0x01] {
            self.write_byte(cmd, MODE_CMD);
        }
    }

    fn pulse_enable(&mut self) {
        std::thread::sleep(E_DELAY);
        self.gpio.digital_write(self.pins.enable, true);
        std::thread::sleep(E_PULSE);
        self.gpio.digital_write(self.pins.enable, false);
        std::thread::sleep(E_DELAY);
    }

    fn write_nibble(&mut self, nibble: u8) {
        self.gpio.digital_write(self.pins.data4, nibble & 0x1 != 0);
        self.gpio.digital_write(self.pins.data5, nibble & 0x2 != 0);
        self.gpio.digital_write(self.pins.data6, nibble & 0x4 != 0);
        self.gpio.digital_write(self.pins.data7, nibble & 0x8 != 0);
        self.pulse_enable();
    }

    fn write_byte(&mut self, bits: u8, mode: bool) {
        self.gpio.digital_write(self.pins.register_select, mode);
        self.write_nibble(bits >> 4);
        self.write_nibble(bits & 0x0F);
    }

    /// Borrow the underlying GPIO backend (used by driver tests)
    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

impl<G: GpioInterface> DisplayInterface for Hd44780Display<G> {
    fn write_line(&mut self, line: DisplayLine, text: &str) -> HwResult<()> {
        let addr = match line {
            DisplayLine::Top => LINE_1_ADDR,
            DisplayLine::Bottom => LINE_2_ADDR,
        };
        self.write_byte(addr, MODE_CMD);
        for ch in fit_line(text).chars() {
            self.write_byte(ch as u8, MODE_CHR);
        }
        Ok(())
    }

    fn clear(&mut self) -> HwResult<()> {
        self.write_byte(0x01, MODE_CMD);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::MockGpio;

    const PINS: LcdPins = LcdPins {
        register_select: 7,
        enable: 2,
        data4: 13,
        data5: 14,
        data6: 12,
        data7: 3,
    };

    fn enable_pulses(gpio: &MockGpio) -> usize {
        gpio.write_log()
            .iter()
            .filter(|(pin, level)| *pin == PINS.enable && *level)
            .count()
    }

    #[test]
    fn test_init_sends_six_commands() {
        let lcd = Hd44780Display::new(MockGpio::new(), PINS).unwrap();
        // Two enable pulses per byte, six init bytes.
        assert_eq!(enable_pulses(lcd.gpio()), 12);
    }

    #[test]
    fn test_write_line_latches_full_width() {
        let mut lcd = Hd44780Display::new(MockGpio::new(), PINS).unwrap();
        let before = enable_pulses(lcd.gpio());
        lcd.write_line(DisplayLine::Top, "hi").unwrap();
        // One address command plus sixteen padded characters.
        assert_eq!(enable_pulses(lcd.gpio()) - before, 17 * 2);
    }

    #[test]
    fn test_register_select_high_for_characters() {
        let mut lcd = Hd44780Display::new(MockGpio::new(), PINS).unwrap();
        lcd.write_line(DisplayLine::Bottom, "x").unwrap();
        assert!(lcd.gpio().level(PINS.register_select));
    }

    #[test]
    fn test_rejects_duplicate_pins() {
        let mut pins = PINS;
        pins.data4 = pins.enable;
        assert!(Hd44780Display::new(MockGpio::new(), pins).is_err());
    }
}
