//! Strongly typed pin numbers, so SDA and SCL cannot be swapped at a call
//! site.

/// GPIO number as understood by the pin matrix.
pub type GpioNum = u8;

macro_rules! strong_pin {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(GpioNum);

        impl $name {
            pub const fn new(gpio: GpioNum) -> Self {
                Self(gpio)
            }

            pub const fn gpio(self) -> GpioNum {
                self.0
            }
        }

        impl From<GpioNum> for $name {
            fn from(gpio: GpioNum) -> Self {
                Self(gpio)
            }
        }
    };
}

strong_pin!(
    /// Serial data line.
    SdaPin
);
strong_pin!(
    /// Serial clock line.
    SclPin
);
