#![no_std]
//! Shared plumbing for the `ph-*` peripheral drivers.
//!
//! Every fallible driver call returns [`Result`], carrying the failing
//! operation's name and either a driver-independent [`ErrorKind`] or the
//! native status reported by the underlying transport. Calls that produce a
//! value alongside the object that produced it return a [`RetVal`], which
//! keeps method chaining available after a read.

mod error;
mod ret;
mod timeout;

pub use error::{Error, ErrorKind, Result};
pub use ret::RetVal;
pub use timeout::Timeout;
