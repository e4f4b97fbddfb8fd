use core::fmt;

/// What went wrong, independent of which operation failed.
#[derive(derive_more::From, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind<E> {
    /// The handle the operation needs is not open.
    InvalidState,
    /// An argument is outside what the peripheral accepts.
    InvalidArg,
    /// A payload does not fit, or the driver moved fewer bytes than asked.
    InvalidSize,
    /// The wait window elapsed without any data arriving.
    NoData,
    /// The underlying driver reported a non-success status (timeouts
    /// included), preserved verbatim.
    Driver(E),
}

/// Error returned by every fallible driver operation.
///
/// `op` names the operation that failed, e.g. `"Device::send"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error<E> {
    op: &'static str,
    kind: ErrorKind<E>,
}

pub type Result<T, E> = core::result::Result<T, Error<E>>;

impl<E> Error<E> {
    pub const fn new(op: &'static str, kind: ErrorKind<E>) -> Self {
        Self { op, kind }
    }

    pub const fn invalid_state(op: &'static str) -> Self {
        Self::new(op, ErrorKind::InvalidState)
    }

    pub const fn invalid_arg(op: &'static str) -> Self {
        Self::new(op, ErrorKind::InvalidArg)
    }

    pub const fn invalid_size(op: &'static str) -> Self {
        Self::new(op, ErrorKind::InvalidSize)
    }

    pub const fn no_data(op: &'static str) -> Self {
        Self::new(op, ErrorKind::NoData)
    }

    pub fn driver(op: &'static str, status: E) -> Self {
        Self::new(op, ErrorKind::from(status))
    }

    /// Name of the operation that failed.
    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn kind(&self) -> &ErrorKind<E> {
        &self.kind
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidState)
    }

    /// The native driver status, if the driver is what failed.
    pub fn driver_status(&self) -> Option<&E> {
        match &self.kind {
            ErrorKind::Driver(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidState => {
                write!(f, "{}: handle not open", self.op)
            }
            ErrorKind::InvalidArg => write!(f, "{}: invalid argument", self.op),
            ErrorKind::InvalidSize => write!(f, "{}: invalid size", self.op),
            ErrorKind::NoData => write!(f, "{}: no data", self.op),
            ErrorKind::Driver(status) => {
                write!(f, "{}: driver status {:?}", self.op, status)
            }
        }
    }
}

/// Driver failures keep the driver's own bus-level kind. Argument, size and
/// state errors are raised before anything reaches the bus and have no
/// bus-level counterpart, so they report `Other`.
impl<E: embedded_hal::i2c::Error> embedded_hal::i2c::Error for Error<E> {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match &self.kind {
            ErrorKind::Driver(status) => status.kind(),
            _ => embedded_hal::i2c::ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use embedded_hal::i2c::{ErrorKind as I2cErrorKind, NoAcknowledgeSource};
    use std::string::ToString;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Status(i32);

    #[test]
    fn driver_status_is_preserved() {
        let err = Error::driver("Device::send", Status(0x107));
        assert_eq!(err.op(), "Device::send");
        assert_eq!(err.driver_status(), Some(&Status(0x107)));
        assert!(!err.is_invalid_state());
    }

    #[test]
    fn display_names_operation() {
        let err: Error<Status> = Error::invalid_state("Device::recv");
        assert_eq!(err.to_string(), "Device::recv: handle not open");

        let err = Error::driver("BusMaster::open", Status(-1));
        assert_eq!(
            err.to_string(),
            "BusMaster::open: driver status Status(-1)"
        );
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    impl embedded_hal::i2c::Error for Nack {
        fn kind(&self) -> I2cErrorKind {
            I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    #[test]
    fn bus_kind_follows_driver_status() {
        let err = Error::driver("Device::transaction", Nack);
        assert_eq!(*err.kind(), ErrorKind::Driver(Nack));
        assert_eq!(
            embedded_hal::i2c::Error::kind(&err),
            I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );

        let err: Error<Nack> = Error::invalid_size("Device::transaction");
        assert_eq!(
            embedded_hal::i2c::Error::kind(&err),
            I2cErrorKind::Other
        );
    }
}
