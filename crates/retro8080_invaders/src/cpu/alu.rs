use super::Cpu8080;

/// True when `value` has an even number of set bits (the 8080 P flag).
pub fn parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

/// Arithmetic/logic operation selected by bits 3-5 of an ALU opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    pub(crate) const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }
}

impl Cpu8080 {
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => {
                let carry = self.flags.carry;
                self.alu_add(value, carry);
            }
            AluOp::Sub => self.regs.a = self.alu_sub_flags(value),
            AluOp::Sbb => {
                // The borrow is folded into the subtrahend modulo 256.
                let subtrahend = value.wrapping_add(self.flags.carry as u8);
                self.regs.a = self.alu_sub_flags(subtrahend);
            }
            AluOp::Ana => self.alu_logic(self.regs.a & value),
            AluOp::Xra => self.alu_logic(self.regs.a ^ value),
            AluOp::Ora => self.alu_logic(self.regs.a | value),
            AluOp::Cmp => {
                self.alu_sub_flags(value);
            }
        }
    }

    fn alu_add(&mut self, value: u8, carry_in: bool) {
        let a = self.regs.a;
        let cin = carry_in as u16;
        let wide = a as u16 + value as u16 + cin;
        let low = (a & 0x0f) as u16 + (value & 0x0f) as u16 + cin;
        let result = wide as u8;

        self.flags.carry = wide & 0x100 != 0;
        self.flags.aux_carry = low & 0x10 != 0;
        self.flags.set_zsp(result);
        self.regs.a = result;
    }

    /// Compute `A - value`, update flags and return the difference.
    fn alu_sub_flags(&mut self, value: u8) -> u8 {
        let a = self.regs.a;
        let result = a.wrapping_sub(value);

        self.flags.carry = a < value;
        self.flags.aux_carry = ((a & 0x0f) + (value.wrapping_neg() & 0x0f)) & 0x10 != 0;
        self.flags.set_zsp(result);
        result
    }

    fn alu_logic(&mut self, result: u8) {
        self.flags.carry = false;
        self.flags.aux_carry = false;
        self.flags.set_zsp(result);
        self.regs.a = result;
    }

    /// INR. Carry is untouched.
    pub(super) fn alu_inr(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.flags.aux_carry = ((value & 0x0f) + 1) & 0x10 != 0;
        self.flags.set_zsp(result);
        result
    }

    /// DCR. Carry is untouched.
    pub(super) fn alu_dcr(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.flags.aux_carry = value & 0x0f == 0;
        self.flags.set_zsp(result);
        result
    }

    /// DAD: HL += value. Only CY is affected.
    pub(super) fn alu_dad(&mut self, value: u16) {
        let (result, carry) = self.regs.hl().overflowing_add(value);
        self.flags.carry = carry;
        self.regs.set_hl(result);
    }

    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;

        if a & 0x0f > 9 || self.flags.aux_carry {
            self.flags.aux_carry = ((a & 0x0f) + 6) & 0x10 != 0;
            let (adjusted, carry) = a.overflowing_add(0x06);
            a = adjusted;
            if carry {
                self.flags.carry = true;
            }
        } else {
            self.flags.aux_carry = false;
        }

        if a & 0xf0 > 0x90 || self.flags.carry {
            let (adjusted, carry) = a.overflowing_add(0x60);
            a = adjusted;
            if carry {
                self.flags.carry = true;
            }
        }

        self.flags.set_zsp(a);
        self.regs.a = a;
    }

    pub(super) fn alu_rlc(&mut self) {
        let a = self.regs.a;
        self.flags.carry = a & 0x80 != 0;
        self.regs.a = a.rotate_left(1);
    }

    pub(super) fn alu_rrc(&mut self) {
        let a = self.regs.a;
        self.flags.carry = a & 0x01 != 0;
        self.regs.a = a.rotate_right(1);
    }

    pub(super) fn alu_ral(&mut self) {
        let a = self.regs.a;
        let carry_in = self.flags.carry as u8;
        self.flags.carry = a & 0x80 != 0;
        self.regs.a = (a << 1) | carry_in;
    }

    pub(super) fn alu_rar(&mut self) {
        let a = self.regs.a;
        let carry_in = (self.flags.carry as u8) << 7;
        self.flags.carry = a & 0x01 != 0;
        self.regs.a = (a >> 1) | carry_in;
    }
}
