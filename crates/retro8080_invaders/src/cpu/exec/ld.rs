use super::super::{Bus8080, Cpu8080, Operand, RegisterPair};

impl Cpu8080 {
    pub(super) fn exec_mov<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x40..=0x7F) && opcode != 0x76);
        let dst = Operand::destination(opcode);
        let src = Operand::source(opcode);
        let value = self.get_operand(bus, src);
        self.set_operand(bus, dst, value);
        self.advance_pc(1);
        if dst.is_memory() || src.is_memory() {
            7
        } else {
            5
        }
    }

    pub(super) fn exec_mvi<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0x06);
        let value = self.immediate(bus, 1);
        self.set_operand(bus, Operand::destination(opcode), value);
        self.advance_pc(2);
        7
    }

    pub(super) fn exec_lxi<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let value = self.address(bus);
        self.regs.set_pair(RegisterPair::from_opcode(opcode), value);
        self.advance_pc(3);
        10
    }

    pub(super) fn exec_stax<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x02 | 0x12));
        let addr = self.regs.pair(RegisterPair::from_opcode(opcode));
        bus.mem_write(addr, self.regs.a);
        self.advance_pc(1);
        7
    }

    pub(super) fn exec_ldax<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0A | 0x1A));
        let addr = self.regs.pair(RegisterPair::from_opcode(opcode));
        self.regs.a = bus.mem_read(addr);
        self.advance_pc(1);
        7
    }

    pub(super) fn exec_sta<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let addr = self.address(bus);
        bus.mem_write(addr, self.regs.a);
        self.advance_pc(3);
        13
    }

    pub(super) fn exec_lda<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let addr = self.address(bus);
        self.regs.a = bus.mem_read(addr);
        self.advance_pc(3);
        13
    }

    pub(super) fn exec_shld<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let addr = self.address(bus);
        bus.mem_write(addr, self.regs.l);
        bus.mem_write(addr.wrapping_add(1), self.regs.h);
        self.advance_pc(3);
        16
    }

    pub(super) fn exec_lhld<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let addr = self.address(bus);
        self.regs.l = bus.mem_read(addr);
        self.regs.h = bus.mem_read(addr.wrapping_add(1));
        self.advance_pc(3);
        16
    }

    pub(super) fn exec_xchg(&mut self) -> u32 {
        let de = self.regs.de();
        self.regs.set_de(self.regs.hl());
        self.regs.set_hl(de);
        self.advance_pc(1);
        5
    }

    pub(super) fn exec_sphl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        self.advance_pc(1);
        5
    }
}
