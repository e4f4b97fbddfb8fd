use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a value on the wire, relative to a little-endian host.
///
/// Implemented for the `byteorder` markers: [`LittleEndian`] moves bytes
/// untouched, [`BigEndian`] runs them through [`swap_words`].
pub trait WireOrder: ByteOrder {
    const SWAPS: bool;

    /// Turn host bytes into wire bytes in place.
    fn to_wire(bytes: &mut [u8], word: usize) {
        if Self::SWAPS {
            swap_words(bytes, word);
        }
    }

    /// Turn wire bytes into host bytes in place.
    fn from_wire(bytes: &mut [u8], word: usize) {
        if Self::SWAPS {
            swap_words(bytes, word);
        }
    }
}

impl WireOrder for LittleEndian {
    const SWAPS: bool = false;
}

impl WireOrder for BigEndian {
    const SWAPS: bool = true;
}

/// Reverse `bytes` as a whole (`word == 0`) or within each `word`-byte
/// chunk. Applying it twice restores the input.
///
/// A trailing partial chunk is left as is; callers keep the length a
/// multiple of `word`.
pub fn swap_words(bytes: &mut [u8], word: usize) {
    match word {
        0 => bytes.reverse(),
        2 => bytes.chunks_exact_mut(2).for_each(|w| {
            let v = LittleEndian::read_u16(w);
            BigEndian::write_u16(w, v);
        }),
        4 => bytes.chunks_exact_mut(4).for_each(|w| {
            let v = LittleEndian::read_u32(w);
            BigEndian::write_u32(w, v);
        }),
        n => bytes.chunks_exact_mut(n).for_each(<[u8]>::reverse),
    }
}
