#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ph_i2c::{AccessLock, BusConfig, DeviceConfig, I2cDriver, SpinLock, Timeout};

/// Status codes the mock driver can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStatus {
    InvalidArg,
    Timeout,
    Fail,
}

impl embedded_hal::i2c::Error for MockStatus {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match self {
            Self::Fail => embedded_hal::i2c::ErrorKind::Bus,
            _ => embedded_hal::i2c::ErrorKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateBus(BusConfig),
    ReleaseBus(u32),
    Attach { bus: u32, config: DeviceConfig },
    Detach(u8),
    Transmit { addr: u8, data: Vec<u8>, timeout: Timeout },
    Receive { addr: u8, len: usize, timeout: Timeout },
    TransmitReceive { addr: u8, tx: Vec<u8>, rx_len: usize, timeout: Timeout },
}

/// One entry of a log shared between a [`RecordingLock`] and the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Acquire,
    Release,
    XferStart(u8),
    XferEnd(u8),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

#[derive(Debug)]
pub struct MockBus(pub u32);

#[derive(Debug)]
pub struct MockDev {
    pub addr: u8,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    regs: HashMap<u8, [u8; 256]>,
    rx_fill: u8,
    fail_next: Option<MockStatus>,
    next_bus: u32,
    live_buses: usize,
    live_devices: usize,
}

/// In-memory I2C transport. Every device address owns a 256-byte register
/// file with auto-incrementing register pointer: the first byte of a
/// write selects the register, the rest are stored from there on.
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<State>,
    events: Option<EventLog>,
    xfer_delay: Option<Duration>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log transfer start/end into `events`, holding each transfer
    /// open for `delay`.
    pub fn with_events(events: EventLog, delay: Duration) -> Self {
        Self { events: Some(events), xfer_delay: Some(delay), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn set_regs(&self, addr: u8, reg: u8, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let file = state.regs.entry(addr).or_insert([0; 256]);
        for (i, b) in bytes.iter().enumerate() {
            file[reg.wrapping_add(i as u8) as usize] = *b;
        }
    }

    pub fn regs(&self, addr: u8, reg: u8, len: usize) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        let file = state.regs.get(&addr).copied().unwrap_or([0; 256]);
        (0..len).map(|i| file[reg.wrapping_add(i as u8) as usize]).collect()
    }

    /// Byte returned by plain receives.
    pub fn set_rx_fill(&self, byte: u8) {
        self.state.lock().unwrap().rx_fill = byte;
    }

    /// Make the next driver call fail with `status`.
    pub fn fail_next(&self, status: MockStatus) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    pub fn live_buses(&self) -> usize {
        self.state.lock().unwrap().live_buses
    }

    pub fn live_devices(&self) -> usize {
        self.state.lock().unwrap().live_devices
    }

    fn record(&self, call: Call) -> Result<(), MockStatus> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn xfer<T>(&self, addr: u8, f: impl FnOnce(&mut State) -> T) -> T {
        self.event(Event::XferStart(addr));
        if let Some(delay) = self.xfer_delay {
            std::thread::sleep(delay);
        }
        let mut state = self.state.lock().unwrap();
        let out = f(&mut state);
        drop(state);
        self.event(Event::XferEnd(addr));
        out
    }

    fn event(&self, event: Event) {
        if let Some(events) = &self.events {
            events.lock().unwrap().push(event);
        }
    }
}

impl I2cDriver for MockDriver {
    type Bus = MockBus;
    type Device = MockDev;
    type Error = MockStatus;

    fn create_bus(&self, config: &BusConfig) -> Result<MockBus, MockStatus> {
        self.record(Call::CreateBus(*config))?;
        if config.sda.gpio() == config.scl.gpio() {
            return Err(MockStatus::InvalidArg);
        }
        let mut state = self.state.lock().unwrap();
        state.next_bus += 1;
        state.live_buses += 1;
        Ok(MockBus(state.next_bus))
    }

    fn release_bus(&self, bus: MockBus) {
        let _ = self.record(Call::ReleaseBus(bus.0));
        self.state.lock().unwrap().live_buses -= 1;
    }

    fn attach(
        &self,
        bus: &MockBus,
        config: &DeviceConfig,
    ) -> Result<MockDev, MockStatus> {
        self.record(Call::Attach { bus: bus.0, config: *config })?;
        self.state.lock().unwrap().live_devices += 1;
        Ok(MockDev { addr: config.address })
    }

    fn detach(&self, device: MockDev) {
        let _ = self.record(Call::Detach(device.addr));
        self.state.lock().unwrap().live_devices -= 1;
    }

    fn transmit(
        &self,
        device: &MockDev,
        data: &[u8],
        timeout: Timeout,
    ) -> Result<(), MockStatus> {
        self.record(Call::Transmit {
            addr: device.addr,
            data: data.to_vec(),
            timeout,
        })?;
        self.xfer(device.addr, |state| {
            if let Some((reg, payload)) = data.split_first() {
                let file = state.regs.entry(device.addr).or_insert([0; 256]);
                for (i, b) in payload.iter().enumerate() {
                    file[reg.wrapping_add(i as u8) as usize] = *b;
                }
            }
        });
        Ok(())
    }

    fn receive(
        &self,
        device: &MockDev,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), MockStatus> {
        self.record(Call::Receive { addr: device.addr, len: buf.len(), timeout })?;
        self.xfer(device.addr, |state| buf.fill(state.rx_fill));
        Ok(())
    }

    fn transmit_receive(
        &self,
        device: &MockDev,
        write: &[u8],
        read: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), MockStatus> {
        self.record(Call::TransmitReceive {
            addr: device.addr,
            tx: write.to_vec(),
            rx_len: read.len(),
            timeout,
        })?;
        self.xfer(device.addr, |state| {
            let reg = write.first().copied().unwrap_or(0);
            let file = state.regs.get(&device.addr).copied().unwrap_or([0; 256]);
            for (i, b) in read.iter_mut().enumerate() {
                *b = file[reg.wrapping_add(i as u8) as usize];
            }
        });
        Ok(())
    }
}

/// [`SpinLock`] that counts and optionally logs every acquire and release.
#[derive(Default)]
pub struct RecordingLock {
    inner: SpinLock,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    events: Option<EventLog>,
}

impl RecordingLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: EventLog) -> Self {
        Self { events: Some(events), ..Self::default() }
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    fn event(&self, event: Event) {
        if let Some(events) = &self.events {
            events.lock().unwrap().push(event);
        }
    }
}

impl AccessLock for RecordingLock {
    fn acquire(&self) {
        self.inner.acquire();
        self.acquires.fetch_add(1, Ordering::SeqCst);
        self.event(Event::Acquire);
    }

    fn release(&self) {
        self.event(Event::Release);
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.inner.release();
    }
}

pub fn sda() -> ph_i2c::SdaPin {
    ph_i2c::SdaPin::new(21)
}

pub fn scl() -> ph_i2c::SclPin {
    ph_i2c::SclPin::new(22)
}
