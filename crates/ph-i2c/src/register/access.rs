/// Direction(s) a register may be accessed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub const fn can_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub const fn can_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level access mode of a register codec.
///
/// Calling `write` on a read-only register (or `read` on a write-only one)
/// does not compile.
pub trait AccessMode: sealed::Sealed {
    const ACCESS: Access;
}

/// Modes that permit `read`.
pub trait Readable: AccessMode {}

/// Modes that permit `write`.
pub trait Writable: AccessMode {}

/// Read-only.
pub enum RO {}
/// Write-only.
pub enum WO {}
/// Read-write.
pub enum RW {}

impl sealed::Sealed for RO {}
impl sealed::Sealed for WO {}
impl sealed::Sealed for RW {}

impl AccessMode for RO {
    const ACCESS: Access = Access::Read;
}

impl AccessMode for WO {
    const ACCESS: Access = Access::Write;
}

impl AccessMode for RW {
    const ACCESS: Access = Access::ReadWrite;
}

impl Readable for RO {}
impl Readable for RW {}
impl Writable for WO {}
impl Writable for RW {}
