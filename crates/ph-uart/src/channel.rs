use bitflags::bitflags;
use ph_core::{Error, RetVal, Timeout};

use crate::config::{
    BufferConfig, DataBits, FlowControl, Parity, Pins, Port, StopBits,
    UartConfig, Wait,
};
use crate::driver::{UartDriver, UartEvent};

bitflags! {
    /// Setup progress of a channel.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    struct State: u8 {
        const CONFIGURED = 0b001;
        const PINS_SET   = 0b010;
        const INSTALLED  = 0b100;
    }
}

/// One UART port and its driver.
///
/// Setters only change the stored configuration; call
/// [`configure`](Self::configure) (and reopen) to apply them. Dropping the
/// channel closes it.
pub struct Channel<D: UartDriver> {
    driver: D,
    port: Port,
    config: UartConfig,
    buffers: BufferConfig,
    events: bool,
    default_wait: Timeout,
    state: State,
    peeked: Option<u8>,
}

impl<D: UartDriver> Channel<D> {
    pub fn new(driver: D, port: Port, baud_rate: u32, parity: Parity) -> Self {
        Self {
            driver,
            port,
            config: UartConfig { baud_rate, parity, ..UartConfig::default() },
            buffers: BufferConfig::default(),
            events: false,
            default_wait: Timeout::Millis(0),
            state: State::empty(),
            peeked: None,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn set_port(&mut self, port: Port) -> &mut Self {
        self.port = port;
        self
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn set_baud_rate(&mut self, baud_rate: u32) -> &mut Self {
        self.config.baud_rate = baud_rate;
        self
    }

    pub fn set_parity(&mut self, parity: Parity) -> &mut Self {
        self.config.parity = parity;
        self
    }

    pub fn set_data_bits(&mut self, bits: DataBits) -> &mut Self {
        self.config.data_bits = bits;
        self
    }

    pub fn set_stop_bits(&mut self, bits: StopBits) -> &mut Self {
        self.config.stop_bits = bits;
        self
    }

    pub fn set_flow_control(&mut self, flow: FlowControl) -> &mut Self {
        self.config.flow_control = flow;
        self
    }

    pub fn buffers(&self) -> &BufferConfig {
        &self.buffers
    }

    pub fn set_rx_buffer_size(&mut self, size: usize) -> &mut Self {
        self.buffers.rx_buffer_size = size;
        self
    }

    pub fn set_tx_buffer_size(&mut self, size: usize) -> &mut Self {
        self.buffers.tx_buffer_size = size;
        self
    }

    pub fn set_queue_size(&mut self, size: usize) -> &mut Self {
        self.buffers.queue_size = size;
        self
    }

    /// Install the driver with an event queue on the next
    /// [`open`](Self::open). Events are then fed through
    /// [`filter_event`](Self::filter_event) by the caller's event loop.
    pub fn set_events(&mut self, enable: bool) -> &mut Self {
        self.events = enable;
        self
    }

    pub fn events(&self) -> bool {
        self.events
    }

    /// Wait used by reads called with [`Wait::Default`]. Starts as 0 ms,
    /// i.e. return whatever is already buffered.
    pub fn set_default_wait(&mut self, wait: Timeout) -> &mut Self {
        self.default_wait = wait;
        self
    }

    pub fn default_wait(&self) -> Timeout {
        self.default_wait
    }

    pub fn is_open(&self) -> bool {
        self.state.contains(State::INSTALLED)
    }

    /// Apply the line parameters.
    pub fn configure(&mut self) -> Result<&mut Self, Error<D::Error>> {
        self.driver
            .param_config(self.port, &self.config)
            .map_err(|e| Error::driver("Channel::configure", e))?;
        self.state.insert(State::CONFIGURED);
        Ok(self)
    }

    /// Route the port to `pins`. Requires [`configure`](Self::configure).
    pub fn set_pins(&mut self, pins: Pins) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::set_pins";

        if !self.state.contains(State::CONFIGURED) {
            return Err(Error::invalid_state(OP));
        }
        self.driver
            .set_pins(self.port, &pins)
            .map_err(|e| Error::driver(OP, e))?;
        self.state.insert(State::PINS_SET);
        Ok(self)
    }

    /// Install the driver. Requires [`set_pins`](Self::set_pins); already
    /// open is a no-op.
    pub fn open(&mut self) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::open";

        if !self.state.contains(State::PINS_SET) {
            return Err(Error::invalid_state(OP));
        }
        if self.is_open() {
            return Ok(self);
        }
        self.driver
            .install(self.port, &self.buffers, self.events)
            .map_err(|e| Error::driver(OP, e))?;
        self.state.insert(State::INSTALLED);
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "uart open: baud={} events={}",
            self.config.baud_rate,
            self.events
        );
        Ok(self)
    }

    /// Uninstall the driver and forget all setup progress. Idempotent.
    pub fn close(&mut self) -> &mut Self {
        if self.is_open() {
            self.driver.uninstall(self.port);
            #[cfg(feature = "defmt")]
            defmt::debug!("uart closed");
        }
        self.state = State::empty();
        self.peeked = None;
        self
    }

    /// Bytes available to [`read`](Self::read) without waiting.
    pub fn ready_to_read(
        &mut self,
    ) -> Result<RetVal<&mut Self, usize>, Error<D::Error>> {
        const OP: &str = "Channel::ready_to_read";

        self.check_open(OP)?;
        let len = self
            .driver
            .buffered_len(self.port)
            .map_err(|e| Error::driver(OP, e))?;
        let len = len + usize::from(self.peeked.is_some());
        Ok(RetVal::new(self, len))
    }

    /// Free space in the TX ring.
    pub fn ready_to_write(
        &mut self,
    ) -> Result<RetVal<&mut Self, usize>, Error<D::Error>> {
        const OP: &str = "Channel::ready_to_write";

        self.check_open(OP)?;
        let len = self
            .driver
            .tx_free(self.port)
            .map_err(|e| Error::driver(OP, e))?;
        Ok(RetVal::new(self, len))
    }

    /// Queue all of `data` for sending.
    ///
    /// A rejected write is an invalid-argument error, a partial one an
    /// invalid-size error.
    pub fn send(&mut self, data: &[u8]) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::send";

        self.check_open(OP)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("uart tx: {=[u8]:x}", data);
        let written = self.driver.write_bytes(self.port, data);
        Self::check_written(OP, written, data.len())?;
        Ok(self)
    }

    /// [`send`](Self::send) followed by a break of `break_len` bit times.
    pub fn send_with_break(
        &mut self,
        data: &[u8],
        break_len: usize,
    ) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::send_with_break";

        self.check_open(OP)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("uart tx+break: {=[u8]:x}", data);
        let written =
            self.driver.write_bytes_with_break(self.port, data, break_len);
        Self::check_written(OP, written, data.len())?;
        Ok(self)
    }

    /// Read up to `buf.len()` bytes. A previously peeked byte is delivered
    /// first and counts towards the returned length.
    pub fn read(
        &mut self,
        buf: &mut [u8],
        wait: Wait,
    ) -> Result<RetVal<&mut Self, usize>, Error<D::Error>> {
        const OP: &str = "Channel::read";

        self.check_open(OP)?;
        if buf.is_empty() {
            return Ok(RetVal::new(self, 0));
        }

        let mut peeked = 0;
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            peeked = 1;
            if buf.len() == 1 {
                return Ok(RetVal::new(self, 1));
            }
        }

        let dst = &mut buf[peeked..];
        let timeout = self.resolve(wait);
        let read = self
            .driver
            .read_bytes(self.port, dst, timeout)
            .map_err(|_| Error::invalid_arg(OP))?
            .min(dst.len());
        #[cfg(feature = "defmt")]
        defmt::trace!("uart rx: {=[u8]:x}", &dst[..read]);
        Ok(RetVal::new(self, read + peeked))
    }

    /// Read exactly one byte, failing with a no-data error if none arrives
    /// within `wait`.
    pub fn read_byte(
        &mut self,
        wait: Wait,
    ) -> Result<RetVal<&mut Self, u8>, Error<D::Error>> {
        let mut byte = [0u8; 1];
        let read = self.read(&mut byte, wait)?.v;
        if read == 0 {
            return Err(Error::no_data("Channel::read_byte"));
        }
        Ok(RetVal::new(self, byte[0]))
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(
        &mut self,
        wait: Wait,
    ) -> Result<RetVal<&mut Self, u8>, Error<D::Error>> {
        if let Some(byte) = self.peeked {
            return Ok(RetVal::new(self, byte));
        }
        let byte = self.read_byte(wait)?.v;
        self.peeked = Some(byte);
        Ok(RetVal::new(self, byte))
    }

    /// Drop buffered input, including a peeked byte.
    pub fn flush(&mut self) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::flush";

        self.check_open(OP)?;
        self.driver
            .flush_input(self.port)
            .map_err(|e| Error::driver(OP, e))?;
        self.peeked = None;
        Ok(self)
    }

    /// Block until everything queued has left the wire.
    pub fn wait_all_sent(&mut self) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Channel::wait_all_sent";

        self.check_open(OP)?;
        self.driver
            .wait_tx_idle(self.port)
            .map_err(|e| Error::driver(OP, e))?;
        Ok(self)
    }

    /// Decide what an event pulled off the driver's queue means to the
    /// application.
    ///
    /// `Data` is dropped when nothing is actually buffered. `BufferFull`
    /// and `FifoOverflow` reset the driver's event queue and are passed on.
    /// Everything else is passed on untouched.
    pub fn filter_event(
        &mut self,
        event: UartEvent,
    ) -> Result<Option<UartEvent>, Error<D::Error>> {
        const OP: &str = "Channel::filter_event";

        match event {
            UartEvent::Data => {
                let buffered = self
                    .driver
                    .buffered_len(self.port)
                    .map_err(|e| Error::driver(OP, e))?;
                Ok((buffered > 0).then_some(event))
            }
            UartEvent::BufferFull | UartEvent::FifoOverflow => {
                #[cfg(feature = "defmt")]
                defmt::warn!("uart rx overrun, resetting event queue");
                self.driver.reset_event_queue(self.port);
                Ok(Some(event))
            }
            _ => Ok(Some(event)),
        }
    }

    fn resolve(&self, wait: Wait) -> Timeout {
        match wait {
            Wait::Default => self.default_wait,
            Wait::For(timeout) => timeout,
        }
    }

    fn check_open(&self, op: &'static str) -> Result<(), Error<D::Error>> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::invalid_state(op))
        }
    }

    fn check_written(
        op: &'static str,
        written: Result<usize, D::Error>,
        expected: usize,
    ) -> Result<(), Error<D::Error>> {
        match written {
            Ok(n) if n == expected => Ok(()),
            Ok(_) => Err(Error::invalid_size(op)),
            Err(_) => Err(Error::invalid_arg(op)),
        }
    }
}

impl<D: UartDriver> Drop for Channel<D> {
    fn drop(&mut self) {
        self.close();
    }
}
