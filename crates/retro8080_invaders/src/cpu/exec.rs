use super::{Bus8080, Cpu8080};

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

impl Cpu8080 {
    /// Decode and execute one opcode. Returns cycles consumed.
    pub(super) fn exec_opcode<B: Bus8080>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        match opcode {
            0x00 => self.exec_nop(),
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_lxi(bus, opcode),
            0x02 | 0x12 => self.exec_stax(bus, opcode),
            0x0A | 0x1A => self.exec_ldax(bus, opcode),
            0x22 => self.exec_shld(bus),
            0x2A => self.exec_lhld(bus),
            0x32 => self.exec_sta(bus),
            0x3A => self.exec_lda(bus),

            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inx(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dcx(opcode),
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => self.exec_inr(bus, opcode),
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => self.exec_dcr(bus, opcode),
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => self.exec_mvi(bus, opcode),

            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate(opcode),
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_dad(opcode),
            0x27 => self.exec_daa(),
            0x2F => self.exec_cma(),
            0x37 => self.exec_stc(),
            0x3F => self.exec_cmc(),

            0x76 => self.exec_hlt(),
            0x40..=0x7F => self.exec_mov(bus, opcode),
            0x80..=0xBF => self.exec_alu_reg(bus, opcode),

            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => self.exec_ret_cc(bus, opcode),
            0xC9 => self.exec_ret(bus),
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push(bus, opcode),
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => self.exec_jmp_cc(bus, opcode),
            0xC3 => self.exec_jmp(bus),
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                self.exec_call_cc(bus, opcode)
            }
            0xCD => self.exec_call(bus),
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => self.exec_alu_imm(bus, opcode),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(bus, opcode),

            0xD3 => self.exec_out(bus),
            0xDB => self.exec_in(bus),
            0xE3 => self.exec_xthl(bus),
            0xE9 => self.exec_pchl(),
            0xEB => self.exec_xchg(),
            0xF9 => self.exec_sphl(),
            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),

            // 0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD
            _ => self.exec_nop(),
        }
    }
}
