use super::super::alu::AluOp;
use super::super::{Bus8080, Cpu8080, Operand, RegisterPair};

impl Cpu8080 {
    pub(super) fn exec_alu_reg<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x80..=0xBF));
        let src = Operand::source(opcode);
        let value = self.get_operand(bus, src);
        self.alu(AluOp::from_opcode(opcode), value);
        self.advance_pc(1);
        if src.is_memory() {
            7
        } else {
            4
        }
    }

    pub(super) fn exec_alu_imm<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));
        let value = self.immediate(bus, 1);
        self.alu(AluOp::from_opcode(opcode), value);
        self.advance_pc(2);
        7
    }

    pub(super) fn exec_rotate(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));
        match opcode {
            0x07 => self.alu_rlc(),
            0x0F => self.alu_rrc(),
            0x17 => self.alu_ral(),
            _ => self.alu_rar(),
        }
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_dad(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.regs.pair(RegisterPair::from_opcode(opcode));
        self.alu_dad(value);
        self.advance_pc(1);
        10
    }

    pub(super) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_cma(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_stc(&mut self) -> u32 {
        self.flags.carry = true;
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_cmc(&mut self) -> u32 {
        self.flags.carry = !self.flags.carry;
        self.advance_pc(1);
        4
    }
}
