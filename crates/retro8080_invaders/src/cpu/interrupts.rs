/// Interrupt enable latch plus a single pending request slot.
///
/// The 8080 has no vector table: the interrupting device places an opcode
/// on the data bus, which the CPU executes in place of the next fetch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterruptController {
    enabled: bool,
    pending: Option<u8>,
}

impl InterruptController {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn pending(&self) -> Option<u8> {
        self.pending
    }

    /// Latch a request. An undelivered request is overwritten.
    pub fn request(&mut self, opcode: u8) {
        self.pending = Some(opcode);
    }

    /// Deliver the pending opcode if interrupts are enabled.
    ///
    /// Delivery clears both the request and the enable latch; the handler is
    /// expected to re-enable with EI.
    pub(super) fn take(&mut self) -> Option<u8> {
        if !self.enabled {
            return None;
        }
        let opcode = self.pending.take()?;
        self.enabled = false;
        Some(opcode)
    }
}
