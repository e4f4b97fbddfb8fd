/// A fixed-size value that can live in one or more consecutive registers.
///
/// The raw form is the value's host memory image: byte `i` of the raw array
/// is the byte at offset `i` of the value in memory.
pub trait RegisterValue: Sized {
    type Raw: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Size in bytes of the raw form.
    const SIZE: usize;

    fn from_raw(raw: Self::Raw) -> Self;

    fn to_raw(&self) -> Self::Raw;
}

macro_rules! impl_register_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RegisterValue for $ty {
                type Raw = [u8; core::mem::size_of::<$ty>()];
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn from_raw(raw: Self::Raw) -> Self {
                    <$ty>::from_ne_bytes(raw)
                }

                fn to_raw(&self) -> Self::Raw {
                    self.to_ne_bytes()
                }
            }
        )*
    };
}

impl_register_value!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl<const N: usize> RegisterValue for [u8; N]
where
    [u8; N]: Default,
{
    type Raw = [u8; N];
    const SIZE: usize = N;

    fn from_raw(raw: Self::Raw) -> Self {
        raw
    }

    fn to_raw(&self) -> Self::Raw {
        *self
    }
}
