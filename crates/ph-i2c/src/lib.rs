#![no_std]
//! Blocking I2C master access: a [`BusMaster`] owning one controller, any
//! number of addressed [`Device`]s borrowing it, and typed register codecs
//! on top.
//!
//! The physical transport is supplied by an [`I2cDriver`] implementation.
//! When several execution contexts share a bus, install an [`AccessLock`]
//! on it; every attach, detach and transfer then holds the lock for its full
//! duration. Without a lock the caller must serialise access to the bus
//! and all of its devices.
//!
//! ```ignore
//! let lock = SpinLock::new();
//! let mut bus = BusMaster::new(driver, SdaPin::new(21), SclPin::new(22));
//! bus.set_access_lock(Some(&lock)).open()?;
//!
//! let imu = bus.add(0x68)?;
//! let who_am_i = imu.read_reg8(0x75, REGISTER_TIMEOUT)?.v;
//! let accel = RegisterMultiByte::<_, [u8; 6], RO, BigEndian, 2>::new(&imu, 0x3b);
//! let sample = accel.read()?;
//! ```

mod bus;
mod config;
mod device;
mod driver;
mod lock;
mod pins;
pub mod register;

pub use bus::BusMaster;
pub use config::{BusConfig, DeviceConfig, I2cPort};
pub use device::{Device, MAX_REGISTER_BYTES};
pub use driver::I2cDriver;
pub use lock::{AccessLock, LockGuard, SpinLock};
pub use ph_core::{Error, ErrorKind, Result, RetVal, Timeout};
pub use pins::{GpioNum, SclPin, SdaPin};
pub use register::REGISTER_TIMEOUT;
