use ph_core::Timeout;

use crate::config::{BusConfig, DeviceConfig};

/// The transport primitive underneath [`BusMaster`](crate::BusMaster) and
/// [`Device`](crate::Device).
///
/// Implementors wrap the vendor I2C master driver: they create and tear down
/// the physical bus, attach and detach endpoints, and run blocking
/// transfers. Handles are opaque to this crate; it only guarantees that
/// every handle returned by `create_bus`/`attach` is handed back exactly
/// once to `release_bus`/`detach`, and that `attach`, `detach` and the
/// transfer calls run with the bus access lock held when one is installed.
pub trait I2cDriver {
    /// An initialised I2C controller.
    type Bus;
    /// An endpoint attached to a bus at a fixed address.
    type Device;
    /// Native status reported on failure, including timeouts.
    type Error: core::fmt::Debug;

    /// Bring up a controller from `config`.
    ///
    /// Fails when the pins conflict, the port is already claimed or the
    /// configuration is otherwise rejected.
    fn create_bus(&self, config: &BusConfig) -> Result<Self::Bus, Self::Error>;

    /// Tear a controller down. Infallible from the caller's perspective.
    fn release_bus(&self, bus: Self::Bus);

    /// Attach an endpoint to `bus`.
    fn attach(
        &self,
        bus: &Self::Bus,
        config: &DeviceConfig,
    ) -> Result<Self::Device, Self::Error>;

    /// Detach an endpoint from its bus.
    fn detach(&self, device: Self::Device);

    /// Write `data` in one transaction.
    fn transmit(
        &self,
        device: &Self::Device,
        data: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Fill `buf` in one transaction.
    fn receive(
        &self,
        device: &Self::Device,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Write `write`, then read into `read` after a repeated start, without
    /// releasing the bus in between.
    fn transmit_receive(
        &self,
        device: &Self::Device,
        write: &[u8],
        read: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;
}

/// Lets one driver instance back several buses, e.g. both controllers of
/// a chip.
impl<T: I2cDriver + ?Sized> I2cDriver for &T {
    type Bus = T::Bus;
    type Device = T::Device;
    type Error = T::Error;

    fn create_bus(&self, config: &BusConfig) -> Result<Self::Bus, Self::Error> {
        T::create_bus(self, config)
    }

    fn release_bus(&self, bus: Self::Bus) {
        T::release_bus(self, bus)
    }

    fn attach(
        &self,
        bus: &Self::Bus,
        config: &DeviceConfig,
    ) -> Result<Self::Device, Self::Error> {
        T::attach(self, bus, config)
    }

    fn detach(&self, device: Self::Device) {
        T::detach(self, device)
    }

    fn transmit(
        &self,
        device: &Self::Device,
        data: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        T::transmit(self, device, data, timeout)
    }

    fn receive(
        &self,
        device: &Self::Device,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        T::receive(self, device, buf, timeout)
    }

    fn transmit_receive(
        &self,
        device: &Self::Device,
        write: &[u8],
        read: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        T::transmit_receive(self, device, write, read, timeout)
    }
}
