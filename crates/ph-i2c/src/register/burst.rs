use core::marker::PhantomData;

use byteorder::LittleEndian;
use ph_core::Timeout;

use super::access::{Access, AccessMode, Readable, Writable};
use super::order::WireOrder;
use super::value::RegisterValue;
use super::{RegisterInterface, REGISTER_TIMEOUT};

/// A value moved in one burst transaction starting at `addr`.
///
/// `O` is the byte order on the wire. With [`BigEndian`] the bytes are
/// reversed as a whole when `WORD` is 0, or within each `WORD`-byte word
/// otherwise. `WORD` must be 0 or an even divisor of the value size, which
/// is checked at compile time.
///
/// [`BigEndian`]: byteorder::BigEndian
pub struct RegisterMultiByte<
    'a,
    I,
    V,
    A,
    O = LittleEndian,
    const WORD: usize = 0,
> {
    iface: &'a I,
    addr: u8,
    timeout: Timeout,
    _marker: PhantomData<(V, A, O)>,
}

impl<'a, I, V, A, O, const WORD: usize> RegisterMultiByte<'a, I, V, A, O, WORD>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: AccessMode,
    O: WireOrder,
{
    const WORD_FITS: () = assert!(
        WORD == 0 || (WORD % 2 == 0 && V::SIZE % WORD == 0),
        "word size must be 0 or an even divisor of the value size"
    );

    pub fn new(iface: &'a I, addr: u8) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WORD_FITS;
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
}

impl<I, V, A, O, const WORD: usize> RegisterMultiByte<'_, I, V, A, O, WORD>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Readable,
    O: WireOrder,
{
    pub fn read(&self) -> Result<V, I::Error> {
        let mut raw = V::Raw::default();
        self.iface.read_reg_multi(self.addr, raw.as_mut(), self.timeout)?;
        O::from_wire(raw.as_mut(), WORD);
        Ok(V::from_raw(raw))
    }
}

impl<I, V, A, O, const WORD: usize> RegisterMultiByte<'_, I, V, A, O, WORD>
where
    I: RegisterInterface,
    V: RegisterValue,
    A: Writable,
    O: WireOrder,
{
    pub fn write(&self, value: &V) -> Result<(), I::Error> {
        let mut raw = value.to_raw();
        O::to_wire(raw.as_mut(), WORD);
        self.iface.write_reg_multi(self.addr, raw.as_ref(), self.timeout)
    }
}
