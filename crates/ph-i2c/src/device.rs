use embedded_hal::i2c::{ErrorType, I2c, Operation};
use heapless::Vec;
use ph_core::{Error, RetVal, Timeout};

use crate::bus::BusMaster;
use crate::config::DeviceConfig;
use crate::driver::I2cDriver;

/// Largest payload the multi-byte register helpers move in one
/// transaction, register address byte excluded.
pub const MAX_REGISTER_BYTES: usize = 32;

const TRANSACTION_BYTES: usize = MAX_REGISTER_BYTES + 1;

/// One addressed endpoint on a [`BusMaster`].
///
/// Every transfer and the attach/detach pair run with the bus access lock
/// held for the whole call. Transfers on a device that is not open fail
/// with an invalid-state error before the lock is touched.
///
/// Dropping the device closes it.
pub struct Device<'a, D: I2cDriver> {
    bus: &'a BusMaster<'a, D>,
    config: DeviceConfig,
    handle: Option<D::Device>,
    hal_timeout: Timeout,
}

impl<'a, D: I2cDriver> Device<'a, D> {
    /// A closed device on `bus`. Nothing is attached until [`open`].
    ///
    /// [`open`]: Self::open
    pub fn new(bus: &'a BusMaster<'a, D>, config: DeviceConfig) -> Self {
        Self {
            bus,
            config,
            handle: None,
            hal_timeout: Timeout::Forever,
        }
    }

    pub fn bus(&self) -> &'a BusMaster<'a, D> {
        self.bus
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Takes effect on the next [`open`](Self::open).
    pub fn set_address(&mut self, address: u8) -> &mut Self {
        self.config.address = address;
        self
    }

    pub fn speed_hz(&self) -> u32 {
        self.config.speed_hz
    }

    /// Takes effect on the next [`open`](Self::open).
    pub fn set_speed_hz(&mut self, speed_hz: u32) -> &mut Self {
        self.config.speed_hz = speed_hz;
        self
    }

    /// Timeout for transfers made through the `embedded-hal` [`I2c`] impl,
    /// [`Timeout::Forever`] unless set.
    pub fn transaction_timeout(&self) -> Timeout {
        self.hal_timeout
    }

    pub fn set_transaction_timeout(&mut self, timeout: Timeout) -> &mut Self {
        self.hal_timeout = timeout;
        self
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Attach to the bus.
    ///
    /// Already open is a no-op. Fails with an invalid-state error if the bus
    /// is closed and with an invalid-argument error if the address does not
    /// fit in 7 bits; the driver is not called in either case.
    pub fn open(&mut self) -> Result<&mut Self, Error<D::Error>> {
        const OP: &str = "Device::open";

        if self.handle.is_some() {
            return Ok(self);
        }
        let bus = self.bus.handle().ok_or(Error::invalid_state(OP))?;
        if self.config.address > DeviceConfig::MAX_ADDRESS {
            return Err(Error::invalid_arg(OP));
        }

        let handle = {
            let _guard = self.bus.lock_guard();
            self.bus.driver().attach(bus, &self.config)
        }
        .map_err(|e| Self::driver_error(OP, e))?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c device open: addr={=u8:#x} speed={}Hz",
            self.config.address,
            self.config.speed_hz
        );
        self.handle = Some(handle);
        Ok(self)
    }

    /// Detach from the bus. Idempotent and never fails.
    pub fn close(&mut self) -> &mut Self {
        if let Some(handle) = self.handle.take() {
            let _guard = self.bus.lock_guard();
            self.bus.driver().detach(handle);
            #[cfg(feature = "defmt")]
            defmt::debug!("i2c device closed: addr={=u8:#x}", self.config.address);
        }
        self
    }

    /// Write `data` in one transaction.
    pub fn send(
        &self,
        data: &[u8],
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        const OP: &str = "Device::send";

        let handle = self.open_handle(OP)?;
        let _guard = self.bus.lock_guard();
        self.bus
            .driver()
            .transmit(handle, data, timeout)
            .map_err(|e| Self::driver_error(OP, e))?;
        Ok(self)
    }

    /// Fill `buf` in one transaction.
    pub fn recv(
        &self,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        const OP: &str = "Device::recv";

        let handle = self.open_handle(OP)?;
        let _guard = self.bus.lock_guard();
        self.bus
            .driver()
            .receive(handle, buf, timeout)
            .map_err(|e| Self::driver_error(OP, e))?;
        Ok(self)
    }

    /// Write `tx`, then fill `rx` after a repeated start.
    pub fn send_recv(
        &self,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        const OP: &str = "Device::send_recv";

        let handle = self.open_handle(OP)?;
        let _guard = self.bus.lock_guard();
        self.bus
            .driver()
            .transmit_receive(handle, tx, rx, timeout)
            .map_err(|e| Self::driver_error(OP, e))?;
        Ok(self)
    }

    pub fn write_reg8(
        &self,
        reg: u8,
        value: u8,
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        self.send(&[reg, value], timeout)
    }

    /// Writes `value` high byte first.
    pub fn write_reg16(
        &self,
        reg: u8,
        value: u16,
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        let [hi, lo] = value.to_be_bytes();
        self.send(&[reg, hi, lo], timeout)
    }

    pub fn read_reg8(
        &self,
        reg: u8,
        timeout: Timeout,
    ) -> Result<RetVal<&Self, u8>, Error<D::Error>> {
        let mut value = [0u8; 1];
        self.send_recv(&[reg], &mut value, timeout)?;
        Ok(RetVal::new(self, value[0]))
    }

    /// Reads two bytes starting at `reg`. The first byte received lands in
    /// the low-addressed byte of the native `u16`, which makes this
    /// asymmetric with [`write_reg16`](Self::write_reg16) on little-endian
    /// hosts. Use a big-endian [`RegisterMultiByte`] for sensors that
    /// transmit MSB first.
    ///
    /// [`RegisterMultiByte`]: crate::register::RegisterMultiByte
    pub fn read_reg16(
        &self,
        reg: u8,
        timeout: Timeout,
    ) -> Result<RetVal<&Self, u16>, Error<D::Error>> {
        let mut value = [0u8; 2];
        self.send_recv(&[reg], &mut value, timeout)?;
        Ok(RetVal::new(self, u16::from_ne_bytes(value)))
    }

    /// Burst read of `dst.len()` bytes starting at `reg`.
    pub fn read_reg_multi(
        &self,
        reg: u8,
        dst: &mut [u8],
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        const OP: &str = "Device::read_reg_multi";

        self.open_handle(OP)?;
        if dst.len() > MAX_REGISTER_BYTES {
            return Err(Error::invalid_size(OP));
        }
        self.send_recv(&[reg], dst, timeout)
    }

    /// Burst write of `src` starting at `reg`, as a single transaction.
    pub fn write_reg_multi(
        &self,
        reg: u8,
        src: &[u8],
        timeout: Timeout,
    ) -> Result<&Self, Error<D::Error>> {
        const OP: &str = "Device::write_reg_multi";

        self.open_handle(OP)?;
        let mut buf: Vec<u8, { MAX_REGISTER_BYTES + 1 }> = Vec::new();
        buf.push(reg).map_err(|_| Error::invalid_size(OP))?;
        buf.extend_from_slice(src)
            .map_err(|_| Error::invalid_size(OP))?;
        self.send(&buf, timeout)
    }

    fn open_handle(
        &self,
        op: &'static str,
    ) -> Result<&D::Device, Error<D::Error>> {
        self.handle.as_ref().ok_or(Error::invalid_state(op))
    }

    fn driver_error(op: &'static str, status: D::Error) -> Error<D::Error> {
        #[cfg(feature = "defmt")]
        defmt::warn!("{}: driver reported failure", op);
        Error::driver(op, status)
    }
}

impl<D: I2cDriver> Drop for Device<'_, D> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<D: I2cDriver> ErrorType for Device<'_, D>
where
    D::Error: embedded_hal::i2c::Error,
{
    type Error = Error<D::Error>;
}

/// `embedded-hal` view of an open device, for drivers written against the
/// generic [`I2c`] trait.
///
/// `address` must equal the configured address. Adjacent writes are joined
/// into one buffer and adjacent reads are filled from one buffer, so every
/// accepted sequence is a single driver transfer: writes only, reads only,
/// or writes followed by reads with a repeated start in between. A read
/// followed by a write has no single-transfer equivalent and is rejected
/// with an invalid-argument error. Joined writes (or joined reads) are
/// limited to [`MAX_REGISTER_BYTES`] + 1 bytes.
///
/// Transfers use [`transaction_timeout`](Device::transaction_timeout).
impl<D: I2cDriver> I2c for Device<'_, D>
where
    D::Error: embedded_hal::i2c::Error,
{
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        const OP: &str = "Device::transaction";

        if address != self.config.address {
            return Err(Error::invalid_arg(OP));
        }
        let handle = self.open_handle(OP)?;
        if operations.is_empty() {
            return Ok(());
        }

        let split = operations
            .iter()
            .position(|op| matches!(op, Operation::Read(_)))
            .unwrap_or(operations.len());
        let (writes, reads) = operations.split_at_mut(split);
        if reads.iter().any(|op| matches!(op, Operation::Write(_))) {
            return Err(Error::invalid_arg(OP));
        }

        let mut tx_buf: Vec<u8, TRANSACTION_BYTES> = Vec::new();
        let tx: &[u8] = match &*writes {
            [Operation::Write(tx)] => *tx,
            writes => {
                for op in writes {
                    if let Operation::Write(bytes) = op {
                        tx_buf
                            .extend_from_slice(bytes)
                            .map_err(|_| Error::invalid_size(OP))?;
                    }
                }
                &tx_buf
            }
        };

        let (has_writes, has_reads) = (!writes.is_empty(), !reads.is_empty());
        let joined = reads.len() > 1;
        let mut rx_buf = [0u8; TRANSACTION_BYTES];
        let rx: &mut [u8] = match &mut *reads {
            [Operation::Read(rx)] => &mut **rx,
            reads => {
                let len = reads
                    .iter()
                    .map(|op| match op {
                        Operation::Read(buf) => buf.len(),
                        Operation::Write(_) => 0,
                    })
                    .sum::<usize>();
                rx_buf
                    .get_mut(..len)
                    .ok_or(Error::invalid_size(OP))?
            }
        };

        let timeout = self.hal_timeout;
        let driver = self.bus.driver();
        {
            let _guard = self.bus.lock_guard();
            match (has_writes, has_reads) {
                (_, false) => driver.transmit(handle, tx, timeout),
                (false, true) => driver.receive(handle, rx, timeout),
                (true, true) => driver.transmit_receive(handle, tx, rx, timeout),
            }
            .map_err(|e| Self::driver_error(OP, e))?;
        }

        if joined {
            let mut rest = &rx_buf[..];
            for op in reads.iter_mut() {
                if let Operation::Read(buf) = op {
                    let (head, tail) = rest.split_at(buf.len());
                    buf.copy_from_slice(head);
                    rest = tail;
                }
            }
        }
        Ok(())
    }
}
