use core::marker::PhantomData;

use ph_core::Timeout;

use super::access::{Access, AccessMode, Readable, Writable};
use super::value::RegisterValue;
use super::{RegisterInterface, REGISTER_TIMEOUT};

/// A value spread over consecutive single-byte registers, moved one byte
/// per transaction.
///
/// Byte `i` of the value's memory image lives at `addr + i`. Use this for
/// peripherals that do not auto-increment the register pointer; prefer
/// [`RegisterMultiByte`](super::RegisterMultiByte) otherwise.
pub struct Register<'a, I, V, A> {
    iface: &'a I,
    addr: u8,
    timeout: Timeout,
    _marker: PhantomData<(V, A)>,
}

impl<'a, I, V, A> Register<'a, I, V, A>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: AccessMode,
{
    pub const fn new(iface: &'a I, addr: u8) -> Self {
        Self { iface, addr, timeout: REGISTER_TIMEOUT, _marker: PhantomData }
    }

    /// Per-transaction timeout, [`REGISTER_TIMEOUT`] unless set.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn access(&self) -> Access {
        A::ACCESS
    }

    fn reg(&self, offset: usize) -> u8 {
        self.addr.wrapping_add(offset as u8)
    }
}

impl<I, V, A> Register<'_, I, V, A>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Readable,
{
    /// Stops at the first failing byte.
    pub fn read(&self) -> Result<V, I::Error> {
        let mut raw = V::Raw::default();
        for (i, byte) in raw.as_mut().iter_mut().enumerate() {
            *byte = self.iface.read_reg8(self.reg(i), self.timeout)?;
        }
        Ok(V::from_raw(raw))
    }
}

impl<I, V, A> Register<'_, I, V, A>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Writable,
{
    /// Stops at the first failing byte; earlier bytes stay written.
    pub fn write(&self, value: &V) -> Result<(), I::Error> {
        let raw = value.to_raw();
        for (i, byte) in raw.as_ref().iter().enumerate() {
            self.iface.write_reg8(self.reg(i), *byte, self.timeout)?;
        }
        Ok(())
    }
}
