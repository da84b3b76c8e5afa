/// Next unused offset in the current frame or global data area.
///
/// Callers lay out storage by advancing the cursor; no alignment or overflow checks happen here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackFrameCursor {
    offset: i32,
}

impl StackFrameCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Reserves `bytes` and returns the offset of the reserved slot.
    pub fn advance(&mut self, bytes: i32) -> i32 {
        let slot = self.offset;
        self.offset = self.offset.wrapping_add(bytes);
        slot
    }

    pub fn set(&mut self, offset: i32) {
        self.offset = offset;
    }
}
