#![no_std]
//! Status indication on a single addressable RGB LED.

use core::iter;

use embedded_hal::delay::DelayNs;
use ph_core::Error;
use smart_leds::{brightness, colors};
use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Number of time slots in a [`StatusLed::blink_pattern`] period, one per
/// pattern bit.
pub const PATTERN_SLOTS: u32 = u32::BITS;

/// One on-board RGB LED driven through a [`SmartLedsWrite`] strip of length
/// one.
pub struct StatusLed<L, D> {
    led: L,
    delay: D,
    brightness: u8,
}

impl<L, D> StatusLed<L, D>
where
    L: SmartLedsWrite<Color = RGB8>,
    D: DelayNs,
{
    /// Full brightness. Call [`init`](Self::init) before first use.
    pub fn new(led: L, delay: D) -> Self {
        Self { led, delay, brightness: u8::MAX }
    }

    /// Scale every color written from now on by `level / 255`.
    pub fn set_brightness(&mut self, level: u8) -> &mut Self {
        self.brightness = level;
        self
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Turn the LED off.
    pub fn init(&mut self) -> Result<(), Error<L::Error>> {
        self.write("StatusLed::init", colors::BLACK)
    }

    pub fn clear(&mut self) -> Result<(), Error<L::Error>> {
        self.write("StatusLed::clear", colors::BLACK)
    }

    /// Show `color`, or turn the LED off.
    pub fn blink(&mut self, on: bool, color: RGB8) -> Result<(), Error<L::Error>> {
        if on {
            self.write("StatusLed::blink", color)
        } else {
            self.clear()
        }
    }

    /// Play `pattern` once over `period_ms`.
    ///
    /// Bit `i` (LSB first) decides whether the LED shows `color` during slot
    /// `i`, each slot lasting `period_ms / 32`. The LED is only written when
    /// the state changes from one slot to the next, and is left in the state
    /// of the last slot.
    pub fn blink_pattern(
        &mut self,
        pattern: u32,
        color: RGB8,
        period_ms: u32,
    ) -> Result<(), Error<L::Error>> {
        let slot_ms = period_ms / PATTERN_SLOTS;
        let mut prev = None;

        for i in 0..PATTERN_SLOTS {
            let on = (pattern >> i) & 1 == 1;
            if prev != Some(on) {
                self.blink(on, color)?;
            }
            prev = Some(on);
            self.delay.delay_ms(slot_ms);
        }
        Ok(())
    }

    /// Give back the LED and delay.
    pub fn release(self) -> (L, D) {
        (self.led, self.delay)
    }

    fn write(&mut self, op: &'static str, color: RGB8) -> Result<(), Error<L::Error>> {
        self.led
            .write(brightness(iter::once(color), self.brightness))
            .map_err(|e| Error::driver(op, e))
    }
}
