/// Per-call wait window for a blocking transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timeout {
    /// Block until the transaction completes.
    #[default]
    Forever,
    /// Give up after this many milliseconds.
    Millis(u32),
}

impl Timeout {
    pub const fn from_millis(ms: u32) -> Self {
        Self::Millis(ms)
    }

    pub const fn is_forever(&self) -> bool {
        matches!(self, Self::Forever)
    }

    /// `None` means wait indefinitely.
    pub const fn as_millis(&self) -> Option<u32> {
        match self {
            Self::Forever => None,
            Self::Millis(ms) => Some(*ms),
        }
    }
}
