use ph_core::Timeout;

use crate::config::{BufferConfig, Pins, Port, UartConfig};

/// Events reported by the driver's event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartEvent {
    Data,
    Break,
    BufferFull,
    FifoOverflow,
    FrameError,
    ParityError,
    DataBreak,
    PatternDetected,
}

/// The vendor UART driver underneath a [`Channel`](crate::Channel).
///
/// All calls address a port explicitly; the channel never keeps driver
/// state beyond what it installs.
pub trait UartDriver {
    /// Native status reported on failure.
    type Error: core::fmt::Debug;

    /// Apply line parameters to `port`.
    fn param_config(
        &mut self,
        port: Port,
        config: &UartConfig,
    ) -> Result<(), Self::Error>;

    fn set_pins(&mut self, port: Port, pins: &Pins) -> Result<(), Self::Error>;

    /// Allocate ring buffers and start the driver, with an event queue when
    /// `events` is set.
    fn install(
        &mut self,
        port: Port,
        buffers: &BufferConfig,
        events: bool,
    ) -> Result<(), Self::Error>;

    fn uninstall(&mut self, port: Port);

    /// Bytes waiting in the RX ring.
    fn buffered_len(&mut self, port: Port) -> Result<usize, Self::Error>;

    /// Free space in the TX ring.
    fn tx_free(&mut self, port: Port) -> Result<usize, Self::Error>;

    /// Queue `data` for sending, returning how many bytes were accepted.
    fn write_bytes(&mut self, port: Port, data: &[u8])
        -> Result<usize, Self::Error>;

    /// Like [`write_bytes`](Self::write_bytes), followed by a break of
    /// `break_len` bit times.
    fn write_bytes_with_break(
        &mut self,
        port: Port,
        data: &[u8],
        break_len: usize,
    ) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout`. Returns how
    /// many bytes were read, possibly 0.
    fn read_bytes(
        &mut self,
        port: Port,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<usize, Self::Error>;

    /// Discard everything in the RX ring.
    fn flush_input(&mut self, port: Port) -> Result<(), Self::Error>;

    /// Block until the TX FIFO has drained.
    fn wait_tx_idle(&mut self, port: Port) -> Result<(), Self::Error>;

    fn reset_event_queue(&mut self, port: Port);
}

impl<T: UartDriver + ?Sized> UartDriver for &mut T {
    type Error = T::Error;

    fn param_config(
        &mut self,
        port: Port,
        config: &UartConfig,
    ) -> Result<(), Self::Error> {
        T::param_config(self, port, config)
    }

    fn set_pins(&mut self, port: Port, pins: &Pins) -> Result<(), Self::Error> {
        T::set_pins(self, port, pins)
    }

    fn install(
        &mut self,
        port: Port,
        buffers: &BufferConfig,
        events: bool,
    ) -> Result<(), Self::Error> {
        T::install(self, port, buffers, events)
    }

    fn uninstall(&mut self, port: Port) {
        T::uninstall(self, port)
    }

    fn buffered_len(&mut self, port: Port) -> Result<usize, Self::Error> {
        T::buffered_len(self, port)
    }

    fn tx_free(&mut self, port: Port) -> Result<usize, Self::Error> {
        T::tx_free(self, port)
    }

    fn write_bytes(&mut self, port: Port, data: &[u8])
        -> Result<usize, Self::Error> {
        T::write_bytes(self, port, data)
    }

    fn write_bytes_with_break(
        &mut self,
        port: Port,
        data: &[u8],
        break_len: usize,
    ) -> Result<usize, Self::Error> {
        T::write_bytes_with_break(self, port, data, break_len)
    }

    fn read_bytes(
        &mut self,
        port: Port,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<usize, Self::Error> {
        T::read_bytes(self, port, buf, timeout)
    }

    fn flush_input(&mut self, port: Port) -> Result<(), Self::Error> {
        T::flush_input(self, port)
    }

    fn wait_tx_idle(&mut self, port: Port) -> Result<(), Self::Error> {
        T::wait_tx_idle(self, port)
    }

    fn reset_event_queue(&mut self, port: Port) {
        T::reset_event_queue(self, port)
    }
}
