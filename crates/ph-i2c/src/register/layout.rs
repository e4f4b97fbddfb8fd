use core::fmt;

/// Where one field of a packed register lives in the transported bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ByteLayout {
    /// Index of the transported byte holding the field.
    pub byte_offset: u8,
    /// Position of the field's least significant bit in that byte.
    pub bit_offset: u8,
    /// Width of the field, 1 to 8 bits.
    pub bit_length: u8,
}

impl ByteLayout {
    pub const fn new(byte_offset: u8, bit_offset: u8, bit_length: u8) -> Self {
        Self { byte_offset, bit_offset, bit_length }
    }
}

/// A layout that cannot be packed into or unpacked from its buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Field `index` is empty or runs past bit 7 of its byte.
    InvalidField { index: usize },
    /// Field `index` names a byte outside the transported bytes.
    ByteOutOfRange { index: usize },
    /// The fields add up to more bits than the value holds.
    TooManyBits { bits: usize, capacity: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { index } => {
                write!(f, "layout field {index} does not fit in one byte")
            }
            Self::ByteOutOfRange { index } => {
                write!(f, "layout field {index} is outside the transported bytes")
            }
            Self::TooManyBits { bits, capacity } => write!(
                f,
                "layout needs {bits} bits but the value holds {capacity}"
            ),
        }
    }
}

/// Check that `layout` can be used with `wire_len` transported bytes and a
/// `value_len`-byte value.
pub fn validate(
    layout: &[ByteLayout],
    wire_len: usize,
    value_len: usize,
) -> Result<(), LayoutError> {
    let mut bits = 0usize;
    for (index, field) in layout.iter().enumerate() {
        if field.bit_length == 0
            || u16::from(field.bit_offset) + u16::from(field.bit_length) > 8
        {
            return Err(LayoutError::InvalidField { index });
        }
        if usize::from(field.byte_offset) >= wire_len {
            return Err(LayoutError::ByteOutOfRange { index });
        }
        bits += usize::from(field.bit_length);
    }

    let capacity = value_len * 8;
    if bits > capacity {
        return Err(LayoutError::TooManyBits { bits, capacity });
    }
    Ok(())
}

const fn mask(len: u8) -> u8 {
    ((1u16 << len) - 1) as u8
}

/// Gather the fields described by `layout` out of `wire` and lay them down
/// back to back, least significant bit first, in `value`.
///
/// Only the bits written are touched; a field that does not fit in what is
/// left of a value byte continues in the low bits of the next one.
///
/// `layout` must have passed [`validate`] for these buffer lengths.
pub(crate) fn unpack(layout: &[ByteLayout], wire: &[u8], value: &mut [u8]) {
    let mut cursor = 0usize;
    for field in layout {
        let mut bits = (wire[usize::from(field.byte_offset)] >> field.bit_offset)
            & mask(field.bit_length);
        let mut remaining = field.bit_length;

        while remaining > 0 {
            let byte = cursor / 8;
            let shift = (cursor % 8) as u8;
            let take = remaining.min(8 - shift);
            let m = mask(take) << shift;

            value[byte] = (value[byte] & !m) | ((bits << shift) & m);

            bits = bits.checked_shr(u32::from(take)).unwrap_or(0);
            remaining -= take;
            cursor += usize::from(take);
        }
    }
}

/// Inverse of [`unpack`]: take consecutive bit runs from `value` and place
/// each at its field position in `wire`.
///
/// `layout` must have passed [`validate`] for these buffer lengths.
pub(crate) fn pack(layout: &[ByteLayout], value: &[u8], wire: &mut [u8]) {
    let mut cursor = 0usize;
    for field in layout {
        let mut bits = 0u8;
        let mut got = 0u8;

        while got < field.bit_length {
            let byte = cursor / 8;
            let shift = (cursor % 8) as u8;
            let take = (field.bit_length - got).min(8 - shift);

            bits |= ((value[byte] >> shift) & mask(take)) << got;

            got += take;
            cursor += usize::from(take);
        }

        let m = mask(field.bit_length) << field.bit_offset;
        let slot = &mut wire[usize::from(field.byte_offset)];
        *slot = (*slot & !m) | ((bits << field.bit_offset) & m);
    }
}
