use ph_core::Timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    Port0,
    #[default]
    Port1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    Bits5,
    Bits6,
    Bits7,
    #[default]
    Bits8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    #[default]
    One,
    OneAndHalf,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    #[default]
    Disable,
    Even,
    Odd,
}

/// Hardware flow control lines in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowControl {
    #[default]
    Disable,
    Rts,
    Cts,
    CtsRts,
}

/// Line parameters applied by [`UartDriver::param_config`].
///
/// [`UartDriver::param_config`]: crate::UartDriver::param_config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// RX FIFO level at which RTS is deasserted.
    pub rx_flow_threshold: u8,
}

impl UartConfig {
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;
    pub const DEFAULT_RX_FLOW_THRESHOLD: u8 = 122;
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
            rx_flow_threshold: Self::DEFAULT_RX_FLOW_THRESHOLD,
        }
    }
}

/// Driver-side ring buffers and event queue, sized at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferConfig {
    pub rx_buffer_size: usize,
    pub tx_buffer_size: usize,
    /// Event queue depth, used only when events are enabled.
    pub queue_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { rx_buffer_size: 1024, tx_buffer_size: 1024, queue_size: 10 }
    }
}

/// Pin assignment. `None` leaves a flow control pin unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pins {
    pub tx: u8,
    pub rx: u8,
    pub rts: Option<u8>,
    pub cts: Option<u8>,
}

impl Pins {
    pub const fn new(tx: u8, rx: u8) -> Self {
        Self { tx, rx, rts: None, cts: None }
    }

    pub const fn with_flow_control(mut self, rts: u8, cts: u8) -> Self {
        self.rts = Some(rts);
        self.cts = Some(cts);
        self
    }
}

/// How long a read may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// The channel's default wait.
    #[default]
    Default,
    For(Timeout),
}

impl From<Timeout> for Wait {
    fn from(timeout: Timeout) -> Self {
        Self::For(timeout)
    }
}
