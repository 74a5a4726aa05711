use super::super::{Bus8080, Condition, Cpu8080, Flags, RegisterPair};

impl Cpu8080 {
    pub(super) fn exec_push<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));
        let value = match opcode {
            0xF5 => u16::from_be_bytes([self.regs.a, self.flags.to_byte()]),
            _ => self.regs.pair(RegisterPair::from_opcode(opcode)),
        };
        self.push(bus, value);
        self.advance_pc(1);
        11
    }

    pub(super) fn exec_pop<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));
        let value = self.pop(bus);
        match opcode {
            0xF1 => {
                let [a, flags] = value.to_be_bytes();
                self.regs.a = a;
                self.flags = Flags::from_byte(flags);
            }
            _ => self.regs.set_pair(RegisterPair::from_opcode(opcode), value),
        }
        self.advance_pc(1);
        10
    }

    pub(super) fn exec_xthl<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let sp = self.regs.sp;
        let lo = bus.mem_read(sp);
        let hi = bus.mem_read(sp.wrapping_add(1));
        bus.mem_write(sp, self.regs.l);
        bus.mem_write(sp.wrapping_add(1), self.regs.h);
        self.regs.l = lo;
        self.regs.h = hi;
        self.advance_pc(1);
        18
    }

    pub(super) fn exec_call<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let target = self.address(bus);
        let ret = self.advance_pc(3);
        self.push(bus, ret);
        self.regs.pc = target;
        17
    }

    pub(super) fn exec_call_cc<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0xC4);
        if self.condition(Condition::from_opcode(opcode)) {
            self.exec_call(bus)
        } else {
            self.advance_pc(3);
            11
        }
    }

    pub(super) fn exec_ret<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop(bus);
        10
    }

    pub(super) fn exec_ret_cc<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0xC0);
        if self.condition(Condition::from_opcode(opcode)) {
            self.regs.pc = self.pop(bus);
            11
        } else {
            self.advance_pc(1);
            5
        }
    }

    pub(super) fn exec_rst<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0xC7);
        let ret = self.advance_pc(1);
        self.push(bus, ret);
        self.regs.pc = u16::from(opcode & 0x38);
        11
    }
}
