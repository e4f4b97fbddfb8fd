use ph_core::Error;

use crate::config::{BusConfig, DeviceConfig, I2cPort};
use crate::device::Device;
use crate::driver::I2cDriver;
use crate::lock::{AccessLock, LockGuard};
use crate::pins::{SclPin, SdaPin};

/// One I2C controller: its configuration, its live handle and an optional
/// external access lock shared by every [`Device`] on it.
///
/// Setters only touch the stored configuration. A bus that is already open
/// keeps running with the configuration it was opened with until
/// [`reopen`](Self::reopen) (or `close` + `open`) is called.
///
/// Devices borrow the bus, so it cannot be closed, reconfigured or dropped
/// while any of them is alive. Dropping the bus closes it.
pub struct BusMaster<'l, D: I2cDriver> {
    driver: D,
    config: BusConfig,
    handle: Option<D::Bus>,
    lock: Option<&'l dyn AccessLock>,
}

impl<'l, D: I2cDriver> BusMaster<'l, D> {
    /// A closed bus on `sda`/`scl` with default settings.
    pub fn new(driver: D, sda: SdaPin, scl: SclPin) -> Self {
        Self::with_config(driver, BusConfig::new(sda, scl))
    }

    pub fn with_config(driver: D, config: BusConfig) -> Self {
        Self { driver, config, handle: None, lock: None }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn set_port(&mut self, port: I2cPort) -> &mut Self {
        self.config.port = port;
        self
    }

    pub fn set_sda_pin(&mut self, sda: SdaPin) -> &mut Self {
        self.config.sda = sda;
        self
    }

    pub fn set_scl_pin(&mut self, scl: SclPin) -> &mut Self {
        self.config.scl = scl;
        self
    }

    pub fn set_glitch_ignore_count(&mut self, count: u8) -> &mut Self {
        self.config.glitch_ignore_count = count;
        self
    }

    pub fn set_interrupt_priority(&mut self, priority: i32) -> &mut Self {
        self.config.interrupt_priority = priority;
        self
    }

    pub fn set_internal_pullup(&mut self, enable: bool) -> &mut Self {
        self.config.internal_pullup = enable;
        self
    }

    /// Install (or with `None`, remove) the lock that serialises access to
    /// this bus.
    pub fn set_access_lock(
        &mut self,
        lock: Option<&'l dyn AccessLock>,
    ) -> &mut Self {
        self.lock = lock;
        self
    }

    pub fn access_lock(&self) -> Option<&'l dyn AccessLock> {
        self.lock
    }

    /// Create the physical bus from the stored configuration.
    ///
    /// Already open is a no-op. On driver failure the bus stays closed.
    pub fn open(&mut self) -> Result<&mut Self, Error<D::Error>> {
        if self.handle.is_some() {
            return Ok(self);
        }

        let bus = self.driver.create_bus(&self.config).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("BusMaster::open: driver rejected bus configuration");
            Error::driver("BusMaster::open", e)
        })?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c bus open: sda={} scl={}",
            self.config.sda.gpio(),
            self.config.scl.gpio()
        );
        self.handle = Some(bus);
        Ok(self)
    }

    /// Release the physical bus. Idempotent and never fails.
    pub fn close(&mut self) -> &mut Self {
        if let Some(bus) = self.handle.take() {
            self.driver.release_bus(bus);
            #[cfg(feature = "defmt")]
            defmt::debug!("i2c bus closed");
        }
        self
    }

    /// Close, then open again so that the current configuration applies.
    pub fn reopen(&mut self) -> Result<&mut Self, Error<D::Error>> {
        self.close().open()
    }

    /// Attach a device at `address` with the default speed and open it.
    pub fn add(&self, address: u8) -> Result<Device<'_, D>, Error<D::Error>> {
        self.add_with_config(DeviceConfig::new(address))
    }

    pub fn add_with_config(
        &self,
        config: DeviceConfig,
    ) -> Result<Device<'_, D>, Error<D::Error>> {
        let mut device = Device::new(self, config);
        device.open()?;
        Ok(device)
    }

    pub(crate) fn handle(&self) -> Option<&D::Bus> {
        self.handle.as_ref()
    }

    pub(crate) fn lock_guard(&self) -> LockGuard<'l> {
        LockGuard::acquire(self.lock)
    }
}

impl<D: I2cDriver> Drop for BusMaster<'_, D> {
    fn drop(&mut self) {
        self.close();
    }
}
