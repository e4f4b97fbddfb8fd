use core::marker::PhantomData;

use ph_core::Timeout;

use super::access::{Access, AccessMode, Readable, Writable};
use super::layout::{self, ByteLayout, LayoutError};
use super::value::RegisterValue;
use super::{RegisterInterface, REGISTER_TIMEOUT};

/// A value whose bits are scattered across bit fields of `N` consecutive
/// registers, one layout entry per field.
///
/// Reading transfers `N` bytes in one burst and concatenates the fields, in
/// layout order and least significant bit first, into the value. Writing
/// does the reverse into a zeroed `N`-byte buffer, so wire bits outside
/// every field are sent as 0.
pub struct RegisterCustomBytes<'a, I, V, A, const N: usize> {
    iface: &'a I,
    addr: u8,
    layout: [ByteLayout; N],
    timeout: Timeout,
    _marker: PhantomData<(V, A)>,
}

impl<'a, I, V, A, const N: usize> RegisterCustomBytes<'a, I, V, A, N>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: AccessMode,
{
    pub fn new(
        iface: &'a I,
        addr: u8,
        layout: [ByteLayout; N],
    ) -> Result<Self, LayoutError> {
        layout::validate(&layout, N, V::SIZE)?;
        Ok(Self {
            iface,
            addr,
            layout,
            timeout: REGISTER_TIMEOUT,
            _marker: PhantomData,
        })
    }

    /// Per-transaction timeout, [`REGISTER_TIMEOUT`] unless set.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn layout(&self) -> &[ByteLayout; N] {
        &self.layout
    }

    pub fn access(&self) -> Access {
        A::ACCESS
    }
}

impl<I, V, A, const N: usize> RegisterCustomBytes<'_, I, V, A, N>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Readable,
{
    pub fn read(&self) -> Result<V, I::Error> {
        let mut wire = [0u8; N];
        self.iface.read_reg_multi(self.addr, &mut wire, self.timeout)?;

        let mut raw = V::Raw::default();
        layout::unpack(&self.layout, &wire, raw.as_mut());
        Ok(V::from_raw(raw))
    }
}

impl<I, V, A, const N: usize> RegisterCustomBytes<'_, I, V, A, N>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Writable,
{
    pub fn write(&self, value: &V) -> Result<(), I::Error> {
        let raw = value.to_raw();
        let mut wire = [0u8; N];
        layout::pack(&self.layout, raw.as_ref(), &mut wire);
        self.iface.write_reg_multi(self.addr, &wire, self.timeout)
    }
}
