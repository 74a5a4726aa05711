use super::super::{Bus8080, Condition, Cpu8080};

impl Cpu8080 {
    pub(super) fn exec_jmp<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.address(bus);
        10
    }

    /// Conditional jumps cost 10 cycles whether or not they are taken.
    pub(super) fn exec_jmp_cc<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0xC2);
        if self.condition(Condition::from_opcode(opcode)) {
            self.regs.pc = self.address(bus);
        } else {
            self.advance_pc(3);
        }
        10
    }

    pub(super) fn exec_pchl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        5
    }
}
