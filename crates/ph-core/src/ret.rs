/// A value paired with the object that produced it.
///
/// Reads return this so that a caller can keep chaining calls on the same
/// peripheral after inspecting the value:
///
/// ```ignore
/// let id = dev.read_reg8(WHO_AM_I, Timeout::Forever)?;
/// id.this.write_reg8(CTRL, 0x01, Timeout::Forever)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetVal<R, V> {
    pub this: R,
    pub v: V,
}

impl<R, V> RetVal<R, V> {
    pub const fn new(this: R, v: V) -> Self {
        Self { this, v }
    }

    /// Drop the back-reference and keep the value.
    pub fn into_value(self) -> V {
        self.v
    }
}
