use bitflags::bitflags;

use super::alu::parity;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn set_bc(&mut self, value: u16) {
        [self.b, self.c] = value.to_be_bytes();
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn set_de(&mut self, value: u16) {
        [self.d, self.e] = value.to_be_bytes();
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, value: u16) {
        [self.h, self.l] = value.to_be_bytes();
    }

    pub fn pair(&self, pair: RegisterPair) -> u16 {
        match pair {
            RegisterPair::Bc => self.bc(),
            RegisterPair::De => self.de(),
            RegisterPair::Hl => self.hl(),
            RegisterPair::Sp => self.sp,
        }
    }

    pub fn set_pair(&mut self, pair: RegisterPair, value: u16) {
        match pair {
            RegisterPair::Bc => self.set_bc(value),
            RegisterPair::De => self.set_de(value),
            RegisterPair::Hl => self.set_hl(value),
            RegisterPair::Sp => self.sp = value,
        }
    }
}

bitflags! {
    /// Bit layout of the flag byte pushed by `PUSH PSW`.
    ///
    /// Bit 1 always reads back as 1; bits 3 and 5 are always 0.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct StatusBits: u8 {
        const CARRY = 0b0000_0001;
        const ALWAYS_ONE = 0b0000_0010;
        const PARITY = 0b0000_0100;
        const AUX_CARRY = 0b0001_0000;
        const ZERO = 0b0100_0000;
        const SIGN = 0b1000_0000;
    }
}

/// Condition flags, kept unpacked for cheap access from the executor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    pub sign: bool,
    pub zero: bool,
    pub aux_carry: bool,
    pub parity: bool,
    pub carry: bool,
}

impl Flags {
    pub fn to_byte(self) -> u8 {
        let mut bits = StatusBits::ALWAYS_ONE;
        bits.set(StatusBits::SIGN, self.sign);
        bits.set(StatusBits::ZERO, self.zero);
        bits.set(StatusBits::AUX_CARRY, self.aux_carry);
        bits.set(StatusBits::PARITY, self.parity);
        bits.set(StatusBits::CARRY, self.carry);
        bits.bits()
    }

    /// Unpack a flag byte. The fixed bits 1, 3 and 5 are ignored.
    pub fn from_byte(value: u8) -> Self {
        let bits = StatusBits::from_bits_truncate(value);
        Self {
            sign: bits.contains(StatusBits::SIGN),
            zero: bits.contains(StatusBits::ZERO),
            aux_carry: bits.contains(StatusBits::AUX_CARRY),
            parity: bits.contains(StatusBits::PARITY),
            carry: bits.contains(StatusBits::CARRY),
        }
    }

    /// Set Z, S and P from an 8-bit result.
    pub fn set_zsp(&mut self, value: u8) {
        self.zero = value == 0;
        self.sign = value & 0x80 != 0;
        self.parity = parity(value);
    }
}

/// 8-bit operand selected by a 3-bit register code. `M` is memory at HL.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Operand {
    /// Decode the low three bits of `code`.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => Operand::B,
            1 => Operand::C,
            2 => Operand::D,
            3 => Operand::E,
            4 => Operand::H,
            5 => Operand::L,
            6 => Operand::M,
            _ => Operand::A,
        }
    }

    /// Source operand of a MOV/ALU opcode (bits 0-2).
    pub const fn source(opcode: u8) -> Self {
        Self::from_code(opcode)
    }

    /// Destination operand of a MOV/MVI/INR/DCR opcode (bits 3-5).
    pub const fn destination(opcode: u8) -> Self {
        Self::from_code(opcode >> 3)
    }

    pub const fn is_memory(self) -> bool {
        matches!(self, Operand::M)
    }
}

/// 16-bit register pair selected by bits 4-5 of an opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegisterPair {
    Bc,
    De,
    Hl,
    Sp,
}

impl RegisterPair {
    pub const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 4) & 0x03 {
            0 => RegisterPair::Bc,
            1 => RegisterPair::De,
            2 => RegisterPair::Hl,
            _ => RegisterPair::Sp,
        }
    }
}

/// Branch condition encoded in bits 3-5 of Jcc/Ccc/Rcc.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    pub const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }
}
