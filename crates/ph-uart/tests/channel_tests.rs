use std::collections::VecDeque;

use ph_uart::{
    BufferConfig, Channel, DataBits, ErrorKind, FlowControl, Parity, Pins, Port,
    StopBits, Timeout, UartConfig, UartDriver, UartEvent, Wait,
};

// ---------------------------------------------------------------------------
// Mock driver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MockError(i32);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    ParamConfig(Port, UartConfig),
    SetPins(Port, Pins),
    Install { port: Port, buffers: BufferConfig, events: bool },
    Uninstall(Port),
    ReadBytes { len: usize, timeout: Timeout },
    FlushInput,
    WaitTxIdle,
    ResetEventQueue,
}

#[derive(Default)]
struct MockUart {
    calls: Vec<Call>,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    breaks: Vec<usize>,
    tx_free: usize,
    /// Accept at most this many bytes per write.
    write_limit: Option<usize>,
    reject_writes: bool,
    fail_next: Option<MockError>,
}

impl MockUart {
    fn fail(&mut self) -> Result<(), MockError> {
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn accept(&mut self, data: &[u8]) -> Result<usize, MockError> {
        if self.reject_writes {
            return Err(MockError(-1));
        }
        let n = self.write_limit.map_or(data.len(), |l| l.min(data.len()));
        self.tx.extend_from_slice(&data[..n]);
        Ok(n)
    }
}

impl UartDriver for MockUart {
    type Error = MockError;

    fn param_config(&mut self, port: Port, config: &UartConfig) -> Result<(), MockError> {
        self.calls.push(Call::ParamConfig(port, *config));
        self.fail()
    }

    fn set_pins(&mut self, port: Port, pins: &Pins) -> Result<(), MockError> {
        self.calls.push(Call::SetPins(port, *pins));
        self.fail()
    }

    fn install(
        &mut self,
        port: Port,
        buffers: &BufferConfig,
        events: bool,
    ) -> Result<(), MockError> {
        self.calls.push(Call::Install { port, buffers: *buffers, events });
        self.fail()
    }

    fn uninstall(&mut self, port: Port) {
        self.calls.push(Call::Uninstall(port));
    }

    fn buffered_len(&mut self, _: Port) -> Result<usize, MockError> {
        self.fail()?;
        Ok(self.rx.len())
    }

    fn tx_free(&mut self, _: Port) -> Result<usize, MockError> {
        self.fail()?;
        Ok(self.tx_free)
    }

    fn write_bytes(&mut self, _: Port, data: &[u8]) -> Result<usize, MockError> {
        self.accept(data)
    }

    fn write_bytes_with_break(
        &mut self,
        _: Port,
        data: &[u8],
        break_len: usize,
    ) -> Result<usize, MockError> {
        let n = self.accept(data)?;
        self.breaks.push(break_len);
        Ok(n)
    }

    fn read_bytes(
        &mut self,
        _: Port,
        buf: &mut [u8],
        timeout: Timeout,
    ) -> Result<usize, MockError> {
        self.calls.push(Call::ReadBytes { len: buf.len(), timeout });
        self.fail()?;
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => buf[n] = b,
                None => break,
            }
            n += 1;
        }
        Ok(n)
    }

    fn flush_input(&mut self, _: Port) -> Result<(), MockError> {
        self.calls.push(Call::FlushInput);
        self.rx.clear();
        self.fail()
    }

    fn wait_tx_idle(&mut self, _: Port) -> Result<(), MockError> {
        self.calls.push(Call::WaitTxIdle);
        self.fail()
    }

    fn reset_event_queue(&mut self, _: Port) {
        self.calls.push(Call::ResetEventQueue);
    }
}

fn channel() -> Channel<MockUart> {
    Channel::new(MockUart::default(), Port::Port1, 115_200, Parity::Disable)
}

fn open_channel() -> Channel<MockUart> {
    let mut ch = channel();
    ch.configure().unwrap().set_pins(Pins::new(17, 16)).unwrap().open().unwrap();
    ch.driver_mut().calls.clear();
    ch
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn defaults() {
    let ch = channel();

    assert_eq!(ch.port(), Port::Port1);
    assert_eq!(ch.config().baud_rate, 115_200);
    assert_eq!(ch.config().data_bits, DataBits::Bits8);
    assert_eq!(ch.config().stop_bits, StopBits::One);
    assert_eq!(ch.config().flow_control, FlowControl::Disable);
    assert_eq!(ch.config().rx_flow_threshold, 122);
    assert_eq!(*ch.buffers(), BufferConfig { rx_buffer_size: 1024, tx_buffer_size: 1024, queue_size: 10 });
    assert_eq!(ch.default_wait(), Timeout::Millis(0));
    assert!(!ch.is_open());
}

#[test]
fn configure_applies_stored_parameters() {
    let mut ch = channel();
    ch.set_baud_rate(9600).set_parity(Parity::Even).set_stop_bits(StopBits::Two);

    ch.configure().unwrap();

    let expected = UartConfig {
        baud_rate: 9600,
        parity: Parity::Even,
        stop_bits: StopBits::Two,
        ..UartConfig::default()
    };
    assert_eq!(ch.driver().calls, [Call::ParamConfig(Port::Port1, expected)]);
}

#[test]
fn set_pins_requires_configure() {
    let mut ch = channel();

    let err = ch.set_pins(Pins::new(1, 3)).err().unwrap();

    assert_eq!(*err.kind(), ErrorKind::InvalidState);
    assert_eq!(err.op(), "Channel::set_pins");
    assert!(ch.driver().calls.is_empty());
}

#[test]
fn open_requires_pins() {
    let mut ch = channel();
    ch.configure().unwrap();

    let err = ch.open().err().unwrap();

    assert!(err.is_invalid_state());
    assert!(!ch.is_open());
}

#[test]
fn open_installs_with_or_without_events() {
    let mut ch = channel();
    ch.configure().unwrap().set_pins(Pins::new(17, 16)).unwrap();
    ch.open().unwrap();
    assert!(matches!(
        ch.driver().calls.last(),
        Some(Call::Install { events: false, .. })
    ));

    let mut ch = channel();
    ch.set_events(true).set_queue_size(20);
    ch.configure().unwrap().set_pins(Pins::new(17, 16).with_flow_control(18, 19)).unwrap();
    ch.open().unwrap();
    assert_eq!(
        ch.driver().calls.last(),
        Some(&Call::Install {
            port: Port::Port1,
            buffers: BufferConfig { queue_size: 20, ..BufferConfig::default() },
            events: true,
        })
    );
}

#[test]
fn close_uninstalls_once_and_resets_state() {
    let mut ch = open_channel();

    ch.close().close();

    assert_eq!(ch.driver().calls, [Call::Uninstall(Port::Port1)]);
    assert!(ch.open().err().unwrap().is_invalid_state());
}

#[test]
fn drop_closes() {
    let mut mock = MockUart::default();
    {
        let mut ch = Channel::new(&mut mock, Port::Port0, 9600, Parity::Odd);
        ch.configure().unwrap().set_pins(Pins::new(1, 3)).unwrap().open().unwrap();
    }
    assert_eq!(mock.calls.last(), Some(&Call::Uninstall(Port::Port0)));
}

#[test]
fn driver_failure_is_preserved() {
    let mut ch = channel();
    ch.driver_mut().fail_next = Some(MockError(0x102));

    let err = ch.configure().err().unwrap();

    assert_eq!(err.driver_status(), Some(&MockError(0x102)));
    assert!(ch.set_pins(Pins::new(1, 3)).err().unwrap().is_invalid_state());
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

#[test]
fn transfers_on_closed_channel_are_invalid_state() {
    let mut ch = channel();

    assert!(ch.send(b"hi").err().unwrap().is_invalid_state());
    assert!(ch.read(&mut [0u8; 4], Wait::Default).err().unwrap().is_invalid_state());
    assert!(ch.ready_to_read().err().unwrap().is_invalid_state());
    assert!(ch.flush().err().unwrap().is_invalid_state());
}

#[test]
fn send_writes_everything() {
    let mut ch = open_channel();

    ch.send(b"AT\r\n").unwrap().send_with_break(b"X", 12).unwrap();

    assert_eq!(ch.driver().tx, b"AT\r\nX");
    assert_eq!(ch.driver().breaks, [12]);
}

#[test]
fn short_write_is_invalid_size() {
    let mut ch = open_channel();
    ch.driver_mut().write_limit = Some(2);

    let err = ch.send(b"hello").err().unwrap();

    assert_eq!(*err.kind(), ErrorKind::InvalidSize);
}

#[test]
fn rejected_write_is_invalid_arg() {
    let mut ch = open_channel();
    ch.driver_mut().reject_writes = true;

    let err = ch.send_with_break(b"hello", 4).err().unwrap();

    assert_eq!(*err.kind(), ErrorKind::InvalidArg);
    assert_eq!(err.op(), "Channel::send_with_break");
}

#[test]
fn read_uses_default_wait_unless_given() {
    let mut ch = open_channel();
    ch.set_default_wait(Timeout::Millis(50));
    ch.driver_mut().rx.extend([1, 2, 3]);

    let mut buf = [0u8; 2];
    assert_eq!(ch.read(&mut buf, Wait::Default).unwrap().v, 2);
    assert_eq!(buf, [1, 2]);
    assert_eq!(ch.read(&mut buf, Timeout::Forever.into()).unwrap().v, 1);

    assert_eq!(
        ch.driver().calls,
        [
            Call::ReadBytes { len: 2, timeout: Timeout::Millis(50) },
            Call::ReadBytes { len: 2, timeout: Timeout::Forever },
        ]
    );
}

#[test]
fn empty_read_does_not_touch_driver() {
    let mut ch = open_channel();

    assert_eq!(ch.read(&mut [], Wait::Default).unwrap().v, 0);
    assert!(ch.driver().calls.is_empty());
}

#[test]
fn read_byte_without_data_is_no_data() {
    let mut ch = open_channel();

    let err = ch.read_byte(Wait::Default).err().unwrap();

    assert_eq!(*err.kind(), ErrorKind::NoData);
    assert_eq!(err.op(), "Channel::read_byte");
}

#[test]
fn peeked_byte_is_delivered_first() {
    let mut ch = open_channel();
    ch.driver_mut().rx.extend([0x10, 0x20, 0x30]);

    assert_eq!(ch.peek_byte(Wait::Default).unwrap().v, 0x10);
    // Peeking again does not consume more input
    assert_eq!(ch.peek_byte(Wait::Default).unwrap().v, 0x10);
    assert_eq!(ch.ready_to_read().unwrap().v, 3);

    let mut buf = [0u8; 3];
    assert_eq!(ch.read(&mut buf, Wait::Default).unwrap().v, 3);
    assert_eq!(buf, [0x10, 0x20, 0x30]);
}

#[test]
fn single_byte_read_of_peeked_byte_skips_driver() {
    let mut ch = open_channel();
    ch.driver_mut().rx.extend([0x42]);
    ch.peek_byte(Wait::Default).unwrap();
    ch.driver_mut().calls.clear();

    assert_eq!(ch.read_byte(Wait::Default).unwrap().v, 0x42);
    assert!(ch.driver().calls.is_empty());
}

#[test]
fn flush_drops_peeked_byte() {
    let mut ch = open_channel();
    ch.driver_mut().rx.extend([1, 2]);
    ch.peek_byte(Wait::Default).unwrap();

    ch.flush().unwrap();

    assert!(ch.driver().rx.is_empty());
    assert!(ch.read_byte(Wait::Default).err().unwrap().kind() == &ErrorKind::NoData);
}

#[test]
fn ready_to_write_and_wait_all_sent() {
    let mut ch = open_channel();
    ch.driver_mut().tx_free = 512;

    assert_eq!(ch.ready_to_write().unwrap().v, 512);
    ch.wait_all_sent().unwrap();
    assert_eq!(ch.driver().calls, [Call::WaitTxIdle]);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn data_event_is_dropped_when_nothing_is_buffered() {
    let mut ch = open_channel();

    assert_eq!(ch.filter_event(UartEvent::Data).unwrap(), None);

    ch.driver_mut().rx.push_back(7);
    assert_eq!(ch.filter_event(UartEvent::Data).unwrap(), Some(UartEvent::Data));
}

#[test]
fn overflow_events_reset_the_queue() {
    let mut ch = open_channel();

    for event in [UartEvent::BufferFull, UartEvent::FifoOverflow] {
        assert_eq!(ch.filter_event(event).unwrap(), Some(event));
    }
    assert_eq!(ch.filter_event(UartEvent::Break).unwrap(), Some(UartEvent::Break));

    assert_eq!(ch.driver().calls, [Call::ResetEventQueue, Call::ResetEventQueue]);
}
