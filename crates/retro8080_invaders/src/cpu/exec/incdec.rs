use super::super::{Bus8080, Cpu8080, Operand, RegisterPair};

impl Cpu8080 {
    pub(super) fn exec_inr<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0x04);
        let dst = Operand::destination(opcode);
        let value = self.get_operand(bus, dst);
        let result = self.alu_inr(value);
        self.set_operand(bus, dst, result);
        self.advance_pc(1);
        5
    }

    pub(super) fn exec_dcr<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0x05);
        let dst = Operand::destination(opcode);
        let value = self.get_operand(bus, dst);
        let result = self.alu_dcr(value);
        self.set_operand(bus, dst, result);
        self.advance_pc(1);
        5
    }

    pub(super) fn exec_inx(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));
        let rp = RegisterPair::from_opcode(opcode);
        let value = self.regs.pair(rp).wrapping_add(1);
        self.regs.set_pair(rp, value);
        self.advance_pc(1);
        5
    }

    pub(super) fn exec_dcx(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));
        let rp = RegisterPair::from_opcode(opcode);
        let value = self.regs.pair(rp).wrapping_sub(1);
        self.regs.set_pair(rp, value);
        self.advance_pc(1);
        5
    }
}
