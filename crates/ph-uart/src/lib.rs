#![no_std]
//! Blocking UART channel over a vendor serial driver.
//!
//! A [`Channel`] walks through `configure` → `set_pins` → `open` before any
//! data moves. Reads can look ahead by one byte with
//! [`peek_byte`](Channel::peek_byte); the peeked byte is handed out first
//! by the next read.

mod channel;
mod config;
mod driver;

pub use channel::Channel;
pub use config::{
    BufferConfig, DataBits, FlowControl, Parity, Pins, Port, StopBits,
    UartConfig, Wait,
};
pub use driver::{UartDriver, UartEvent};
pub use ph_core::{Error, ErrorKind, Result, RetVal, Timeout};
