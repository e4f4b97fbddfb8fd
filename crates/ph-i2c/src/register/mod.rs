//! Typed register codecs layered over a byte-oriented register interface.
//!
//! Three shapes are provided:
//!
//! * [`Register`] moves a value one byte per transaction at consecutive
//!   addresses.
//! * [`RegisterMultiByte`] moves a value in one burst and optionally
//!   reorders bytes or words between wire order and host order.
//! * [`RegisterCustomBytes`] scatters a value's bits into (and gathers them
//!   from) arbitrary bit fields of the transported bytes.
//!
//! All of them borrow a [`RegisterInterface`], normally a [`Device`].

mod access;
mod burst;
mod byte;
mod custom;
mod layout;
mod order;
mod value;

pub use access::{Access, AccessMode, Readable, Writable, RO, RW, WO};
pub use burst::RegisterMultiByte;
pub use byte::Register;
pub use byteorder::{BigEndian, LittleEndian};
pub use custom::RegisterCustomBytes;
pub use layout::{ByteLayout, LayoutError};
pub use order::{swap_words, WireOrder};
pub use value::RegisterValue;

use ph_core::{Error, RetVal, Timeout};

use crate::device::Device;
use crate::driver::I2cDriver;

/// Timeout used by the codecs unless overridden per register.
pub const REGISTER_TIMEOUT: Timeout = Timeout::Millis(500);

/// Register-level access to a peripheral with auto-incrementing register
/// addresses.
pub trait RegisterInterface {
    type Error;

    fn read_reg8(&self, reg: u8, timeout: Timeout) -> Result<u8, Self::Error>;

    fn write_reg8(
        &self,
        reg: u8,
        value: u8,
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    fn read_reg_multi(
        &self,
        reg: u8,
        dst: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    fn write_reg_multi(
        &self,
        reg: u8,
        src: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;
}

impl<D: I2cDriver> RegisterInterface for Device<'_, D> {
    type Error = Error<D::Error>;

    fn read_reg8(&self, reg: u8, timeout: Timeout) -> Result<u8, Self::Error> {
        Device::read_reg8(self, reg, timeout).map(RetVal::into_value)
    }

    fn write_reg8(
        &self,
        reg: u8,
        value: u8,
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        Device::write_reg8(self, reg, value, timeout).map(drop)
    }

    fn read_reg_multi(
        &self,
        reg: u8,
        dst: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        Device::read_reg_multi(self, reg, dst, timeout).map(drop)
    }

    fn write_reg_multi(
        &self,
        reg: u8,
        src: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        Device::write_reg_multi(self, reg, src, timeout).map(drop)
    }
}
