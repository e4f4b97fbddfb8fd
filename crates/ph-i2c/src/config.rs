use crate::pins::{SclPin, SdaPin};

/// I2C controller selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum I2cPort {
    /// Let the driver pick a free controller.
    #[default]
    Auto,
    Port0,
    Port1,
}

impl I2cPort {
    /// Controller index, `None` for [`I2cPort::Auto`].
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Auto => None,
            Self::Port0 => Some(0),
            Self::Port1 => Some(1),
        }
    }
}

/// Bus-wide configuration consumed by [`I2cDriver::create_bus`].
///
/// [`I2cDriver::create_bus`]: crate::I2cDriver::create_bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusConfig {
    pub port: I2cPort,
    pub sda: SdaPin,
    pub scl: SclPin,
    /// Glitches shorter than this many APB cycles are filtered out.
    pub glitch_ignore_count: u8,
    /// Interrupt priority, 0 lets the driver choose.
    pub interrupt_priority: i32,
    pub internal_pullup: bool,
}

impl BusConfig {
    pub const DEFAULT_GLITCH_IGNORE_COUNT: u8 = 7;

    pub const fn new(sda: SdaPin, scl: SclPin) -> Self {
        Self {
            port: I2cPort::Auto,
            sda,
            scl,
            glitch_ignore_count: Self::DEFAULT_GLITCH_IGNORE_COUNT,
            interrupt_priority: 0,
            internal_pullup: true,
        }
    }
}

/// Per-device configuration consumed by [`I2cDriver::attach`].
///
/// [`I2cDriver::attach`]: crate::I2cDriver::attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// 7-bit device address.
    pub address: u8,
    /// SCL clock in Hz.
    pub speed_hz: u32,
}

impl DeviceConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD_MODE_HZ: u32 = 100_000;
    /// Fast mode (400 kHz)
    pub const FAST_MODE_HZ: u32 = 400_000;
    /// Fast mode plus (1 MHz)
    pub const FAST_MODE_PLUS_HZ: u32 = 1_000_000;

    /// Highest valid 7-bit address.
    pub const MAX_ADDRESS: u8 = 0x7f;

    pub const fn new(address: u8) -> Self {
        Self { address, speed_hz: Self::STANDARD_MODE_HZ }
    }

    pub const fn with_speed_hz(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }
}
