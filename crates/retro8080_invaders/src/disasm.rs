//! Static-table disassembler used for trace logging and diagnostics.

use std::fmt;

/// Kind of inline operand that follows an opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Arg {
    None,
    Imm8,
    Port,
    Imm16,
    Addr16,
}

struct OpInfo {
    mnemonic: &'static str,
    arg: Arg,
}

impl OpInfo {
    const fn new(mnemonic: &'static str, arg: Arg) -> Self {
        Self { mnemonic, arg }
    }

    const fn len(&self) -> u8 {
        match self.arg {
            Arg::None => 1,
            Arg::Imm8 | Arg::Port => 2,
            Arg::Imm16 | Arg::Addr16 => 3,
        }
    }
}

// Unused opcodes decode as "*NOP", matching how the core executes them.
static OPCODES: [OpInfo; 256] = [
    OpInfo::new("NOP", Arg::None), // 0x00
    OpInfo::new("LXI B,", Arg::Imm16), // 0x01
    OpInfo::new("STAX B", Arg::None), // 0x02
    OpInfo::new("INX B", Arg::None), // 0x03
    OpInfo::new("INR B", Arg::None), // 0x04
    OpInfo::new("DCR B", Arg::None), // 0x05
    OpInfo::new("MVI B,", Arg::Imm8), // 0x06
    OpInfo::new("RLC", Arg::None), // 0x07
    OpInfo::new("*NOP", Arg::None), // 0x08
    OpInfo::new("DAD B", Arg::None), // 0x09
    OpInfo::new("LDAX B", Arg::None), // 0x0A
    OpInfo::new("DCX B", Arg::None), // 0x0B
    OpInfo::new("INR C", Arg::None), // 0x0C
    OpInfo::new("DCR C", Arg::None), // 0x0D
    OpInfo::new("MVI C,", Arg::Imm8), // 0x0E
    OpInfo::new("RRC", Arg::None), // 0x0F
    OpInfo::new("*NOP", Arg::None), // 0x10
    OpInfo::new("LXI D,", Arg::Imm16), // 0x11
    OpInfo::new("STAX D", Arg::None), // 0x12
    OpInfo::new("INX D", Arg::None), // 0x13
    OpInfo::new("INR D", Arg::None), // 0x14
    OpInfo::new("DCR D", Arg::None), // 0x15
    OpInfo::new("MVI D,", Arg::Imm8), // 0x16
    OpInfo::new("RAL", Arg::None), // 0x17
    OpInfo::new("*NOP", Arg::None), // 0x18
    OpInfo::new("DAD D", Arg::None), // 0x19
    OpInfo::new("LDAX D", Arg::None), // 0x1A
    OpInfo::new("DCX D", Arg::None), // 0x1B
    OpInfo::new("INR E", Arg::None), // 0x1C
    OpInfo::new("DCR E", Arg::None), // 0x1D
    OpInfo::new("MVI E,", Arg::Imm8), // 0x1E
    OpInfo::new("RAR", Arg::None), // 0x1F
    OpInfo::new("*NOP", Arg::None), // 0x20
    OpInfo::new("LXI H,", Arg::Imm16), // 0x21
    OpInfo::new("SHLD ", Arg::Addr16), // 0x22
    OpInfo::new("INX H", Arg::None), // 0x23
    OpInfo::new("INR H", Arg::None), // 0x24
    OpInfo::new("DCR H", Arg::None), // 0x25
    OpInfo::new("MVI H,", Arg::Imm8), // 0x26
    OpInfo::new("DAA", Arg::None), // 0x27
    OpInfo::new("*NOP", Arg::None), // 0x28
    OpInfo::new("DAD H", Arg::None), // 0x29
    OpInfo::new("LHLD ", Arg::Addr16), // 0x2A
    OpInfo::new("DCX H", Arg::None), // 0x2B
    OpInfo::new("INR L", Arg::None), // 0x2C
    OpInfo::new("DCR L", Arg::None), // 0x2D
    OpInfo::new("MVI L,", Arg::Imm8), // 0x2E
    OpInfo::new("CMA", Arg::None), // 0x2F
    OpInfo::new("*NOP", Arg::None), // 0x30
    OpInfo::new("LXI SP,", Arg::Imm16), // 0x31
    OpInfo::new("STA ", Arg::Addr16), // 0x32
    OpInfo::new("INX SP", Arg::None), // 0x33
    OpInfo::new("INR M", Arg::None), // 0x34
    OpInfo::new("DCR M", Arg::None), // 0x35
    OpInfo::new("MVI M,", Arg::Imm8), // 0x36
    OpInfo::new("STC", Arg::None), // 0x37
    OpInfo::new("*NOP", Arg::None), // 0x38
    OpInfo::new("DAD SP", Arg::None), // 0x39
    OpInfo::new("LDA ", Arg::Addr16), // 0x3A
    OpInfo::new("DCX SP", Arg::None), // 0x3B
    OpInfo::new("INR A", Arg::None), // 0x3C
    OpInfo::new("DCR A", Arg::None), // 0x3D
    OpInfo::new("MVI A,", Arg::Imm8), // 0x3E
    OpInfo::new("CMC", Arg::None), // 0x3F
    OpInfo::new("MOV B,B", Arg::None), // 0x40
    OpInfo::new("MOV B,C", Arg::None), // 0x41
    OpInfo::new("MOV B,D", Arg::None), // 0x42
    OpInfo::new("MOV B,E", Arg::None), // 0x43
    OpInfo::new("MOV B,H", Arg::None), // 0x44
    OpInfo::new("MOV B,L", Arg::None), // 0x45
    OpInfo::new("MOV B,M", Arg::None), // 0x46
    OpInfo::new("MOV B,A", Arg::None), // 0x47
    OpInfo::new("MOV C,B", Arg::None), // 0x48
    OpInfo::new("MOV C,C", Arg::None), // 0x49
    OpInfo::new("MOV C,D", Arg::None), // 0x4A
    OpInfo::new("MOV C,E", Arg::None), // 0x4B
    OpInfo::new("MOV C,H", Arg::None), // 0x4C
    OpInfo::new("MOV C,L", Arg::None), // 0x4D
    OpInfo::new("MOV C,M", Arg::None), // 0x4E
    OpInfo::new("MOV C,A", Arg::None), // 0x4F
    OpInfo::new("MOV D,B", Arg::None), // 0x50
    OpInfo::new("MOV D,C", Arg::None), // 0x51
    OpInfo::new("MOV D,D", Arg::None), // 0x52
    OpInfo::new("MOV D,E", Arg::None), // 0x53
    OpInfo::new("MOV D,H", Arg::None), // 0x54
    OpInfo::new("MOV D,L", Arg::None), // 0x55
    OpInfo::new("MOV D,M", Arg::None), // 0x56
    OpInfo::new("MOV D,A", Arg::None), // 0x57
    OpInfo::new("MOV E,B", Arg::None), // 0x58
    OpInfo::new("MOV E,C", Arg::None), // 0x59
    OpInfo::new("MOV E,D", Arg::None), // 0x5A
    OpInfo::new("MOV E,E", Arg::None), // 0x5B
    OpInfo::new("MOV E,H", Arg::None), // 0x5C
    OpInfo::new("MOV E,L", Arg::None), // 0x5D
    OpInfo::new("MOV E,M", Arg::None), // 0x5E
    OpInfo::new("MOV E,A", Arg::None), // 0x5F
    OpInfo::new("MOV H,B", Arg::None), // 0x60
    OpInfo::new("MOV H,C", Arg::None), // 0x61
    OpInfo::new("MOV H,D", Arg::None), // 0x62
    OpInfo::new("MOV H,E", Arg::None), // 0x63
    OpInfo::new("MOV H,H", Arg::None), // 0x64
    OpInfo::new("MOV H,L", Arg::None), // 0x65
    OpInfo::new("MOV H,M", Arg::None), // 0x66
    OpInfo::new("MOV H,A", Arg::None), // 0x67
    OpInfo::new("MOV L,B", Arg::None), // 0x68
    OpInfo::new("MOV L,C", Arg::None), // 0x69
    OpInfo::new("MOV L,D", Arg::None), // 0x6A
    OpInfo::new("MOV L,E", Arg::None), // 0x6B
    OpInfo::new("MOV L,H", Arg::None), // 0x6C
    OpInfo::new("MOV L,L", Arg::None), // 0x6D
    OpInfo::new("MOV L,M", Arg::None), // 0x6E
    OpInfo::new("MOV L,A", Arg::None), // 0x6F
    OpInfo::new("MOV M,B", Arg::None), // 0x70
    OpInfo::new("MOV M,C", Arg::None), // 0x71
    OpInfo::new("MOV M,D", Arg::None), // 0x72
    OpInfo::new("MOV M,E", Arg::None), // 0x73
    OpInfo::new("MOV M,H", Arg::None), // 0x74
    OpInfo::new("MOV M,L", Arg::None), // 0x75
    OpInfo::new("HLT", Arg::None), // 0x76
    OpInfo::new("MOV M,A", Arg::None), // 0x77
    OpInfo::new("MOV A,B", Arg::None), // 0x78
    OpInfo::new("MOV A,C", Arg::None), // 0x79
    OpInfo::new("MOV A,D", Arg::None), // 0x7A
    OpInfo::new("MOV A,E", Arg::None), // 0x7B
    OpInfo::new("MOV A,H", Arg::None), // 0x7C
    OpInfo::new("MOV A,L", Arg::None), // 0x7D
    OpInfo::new("MOV A,M", Arg::None), // 0x7E
    OpInfo::new("MOV A,A", Arg::None), // 0x7F
    OpInfo::new("ADD B", Arg::None), // 0x80
    OpInfo::new("ADD C", Arg::None), // 0x81
    OpInfo::new("ADD D", Arg::None), // 0x82
    OpInfo::new("ADD E", Arg::None), // 0x83
    OpInfo::new("ADD H", Arg::None), // 0x84
    OpInfo::new("ADD L", Arg::None), // 0x85
    OpInfo::new("ADD M", Arg::None), // 0x86
    OpInfo::new("ADD A", Arg::None), // 0x87
    OpInfo::new("ADC B", Arg::None), // 0x88
    OpInfo::new("ADC C", Arg::None), // 0x89
    OpInfo::new("ADC D", Arg::None), // 0x8A
    OpInfo::new("ADC E", Arg::None), // 0x8B
    OpInfo::new("ADC H", Arg::None), // 0x8C
    OpInfo::new("ADC L", Arg::None), // 0x8D
    OpInfo::new("ADC M", Arg::None), // 0x8E
    OpInfo::new("ADC A", Arg::None), // 0x8F
    OpInfo::new("SUB B", Arg::None), // 0x90
    OpInfo::new("SUB C", Arg::None), // 0x91
    OpInfo::new("SUB D", Arg::None), // 0x92
    OpInfo::new("SUB E", Arg::None), // 0x93
    OpInfo::new("SUB H", Arg::None), // 0x94
    OpInfo::new("SUB L", Arg::None), // 0x95
    OpInfo::new("SUB M", Arg::None), // 0x96
    OpInfo::new("SUB A", Arg::None), // 0x97
    OpInfo::new("SBB B", Arg::None), // 0x98
    OpInfo::new("SBB C", Arg::None), // 0x99
    OpInfo::new("SBB D", Arg::None), // 0x9A
    OpInfo::new("SBB E", Arg::None), // 0x9B
    OpInfo::new("SBB H", Arg::None), // 0x9C
    OpInfo::new("SBB L", Arg::None), // 0x9D
    OpInfo::new("SBB M", Arg::None), // 0x9E
    OpInfo::new("SBB A", Arg::None), // 0x9F
    OpInfo::new("ANA B", Arg::None), // 0xA0
    OpInfo::new("ANA C", Arg::None), // 0xA1
    OpInfo::new("ANA D", Arg::None), // 0xA2
    OpInfo::new("ANA E", Arg::None), // 0xA3
    OpInfo::new("ANA H", Arg::None), // 0xA4
    OpInfo::new("ANA L", Arg::None), // 0xA5
    OpInfo::new("ANA M", Arg::None), // 0xA6
    OpInfo::new("ANA A", Arg::None), // 0xA7
    OpInfo::new("XRA B", Arg::None), // 0xA8
    OpInfo::new("XRA C", Arg::None), // 0xA9
    OpInfo::new("XRA D", Arg::None), // 0xAA
    OpInfo::new("XRA E", Arg::None), // 0xAB
    OpInfo::new("XRA H", Arg::None), // 0xAC
    OpInfo::new("XRA L", Arg::None), // 0xAD
    OpInfo::new("XRA M", Arg::None), // 0xAE
    OpInfo::new("XRA A", Arg::None), // 0xAF
    OpInfo::new("ORA B", Arg::None), // 0xB0
    OpInfo::new("ORA C", Arg::None), // 0xB1
    OpInfo::new("ORA D", Arg::None), // 0xB2
    OpInfo::new("ORA E", Arg::None), // 0xB3
    OpInfo::new("ORA H", Arg::None), // 0xB4
    OpInfo::new("ORA L", Arg::None), // 0xB5
    OpInfo::new("ORA M", Arg::None), // 0xB6
    OpInfo::new("ORA A", Arg::None), // 0xB7
    OpInfo::new("CMP B", Arg::None), // 0xB8
    OpInfo::new("CMP C", Arg::None), // 0xB9
    OpInfo::new("CMP D", Arg::None), // 0xBA
    OpInfo::new("CMP E", Arg::None), // 0xBB
    OpInfo::new("CMP H", Arg::None), // 0xBC
    OpInfo::new("CMP L", Arg::None), // 0xBD
    OpInfo::new("CMP M", Arg::None), // 0xBE
    OpInfo::new("CMP A", Arg::None), // 0xBF
    OpInfo::new("RNZ", Arg::None), // 0xC0
    OpInfo::new("POP B", Arg::None), // 0xC1
    OpInfo::new("JNZ ", Arg::Addr16), // 0xC2
    OpInfo::new("JMP ", Arg::Addr16), // 0xC3
    OpInfo::new("CNZ ", Arg::Addr16), // 0xC4
    OpInfo::new("PUSH B", Arg::None), // 0xC5
    OpInfo::new("ADI ", Arg::Imm8), // 0xC6
    OpInfo::new("RST 0", Arg::None), // 0xC7
    OpInfo::new("RZ", Arg::None), // 0xC8
    OpInfo::new("RET", Arg::None), // 0xC9
    OpInfo::new("JZ ", Arg::Addr16), // 0xCA
    OpInfo::new("*NOP", Arg::None), // 0xCB
    OpInfo::new("CZ ", Arg::Addr16), // 0xCC
    OpInfo::new("CALL ", Arg::Addr16), // 0xCD
    OpInfo::new("ACI ", Arg::Imm8), // 0xCE
    OpInfo::new("RST 1", Arg::None), // 0xCF
    OpInfo::new("RNC", Arg::None), // 0xD0
    OpInfo::new("POP D", Arg::None), // 0xD1
    OpInfo::new("JNC ", Arg::Addr16), // 0xD2
    OpInfo::new("OUT ", Arg::Port), // 0xD3
    OpInfo::new("CNC ", Arg::Addr16), // 0xD4
    OpInfo::new("PUSH D", Arg::None), // 0xD5
    OpInfo::new("SUI ", Arg::Imm8), // 0xD6
    OpInfo::new("RST 2", Arg::None), // 0xD7
    OpInfo::new("RC", Arg::None), // 0xD8
    OpInfo::new("*NOP", Arg::None), // 0xD9
    OpInfo::new("JC ", Arg::Addr16), // 0xDA
    OpInfo::new("IN ", Arg::Port), // 0xDB
    OpInfo::new("CC ", Arg::Addr16), // 0xDC
    OpInfo::new("*NOP", Arg::None), // 0xDD
    OpInfo::new("SBI ", Arg::Imm8), // 0xDE
    OpInfo::new("RST 3", Arg::None), // 0xDF
    OpInfo::new("RPO", Arg::None), // 0xE0
    OpInfo::new("POP H", Arg::None), // 0xE1
    OpInfo::new("JPO ", Arg::Addr16), // 0xE2
    OpInfo::new("XTHL", Arg::None), // 0xE3
    OpInfo::new("CPO ", Arg::Addr16), // 0xE4
    OpInfo::new("PUSH H", Arg::None), // 0xE5
    OpInfo::new("ANI ", Arg::Imm8), // 0xE6
    OpInfo::new("RST 4", Arg::None), // 0xE7
    OpInfo::new("RPE", Arg::None), // 0xE8
    OpInfo::new("PCHL", Arg::None), // 0xE9
    OpInfo::new("JPE ", Arg::Addr16), // 0xEA
    OpInfo::new("XCHG", Arg::None), // 0xEB
    OpInfo::new("CPE ", Arg::Addr16), // 0xEC
    OpInfo::new("*NOP", Arg::None), // 0xED
    OpInfo::new("XRI ", Arg::Imm8), // 0xEE
    OpInfo::new("RST 5", Arg::None), // 0xEF
    OpInfo::new("RP", Arg::None), // 0xF0
    OpInfo::new("POP PSW", Arg::None), // 0xF1
    OpInfo::new("JP ", Arg::Addr16), // 0xF2
    OpInfo::new("DI", Arg::None), // 0xF3
    OpInfo::new("CP ", Arg::Addr16), // 0xF4
    OpInfo::new("PUSH PSW", Arg::None), // 0xF5
    OpInfo::new("ORI ", Arg::Imm8), // 0xF6
    OpInfo::new("RST 6", Arg::None), // 0xF7
    OpInfo::new("RM", Arg::None), // 0xF8
    OpInfo::new("SPHL", Arg::None), // 0xF9
    OpInfo::new("JM ", Arg::Addr16), // 0xFA
    OpInfo::new("EI", Arg::None), // 0xFB
    OpInfo::new("CM ", Arg::Addr16), // 0xFC
    OpInfo::new("*NOP", Arg::None), // 0xFD
    OpInfo::new("CPI ", Arg::Imm8), // 0xFE
    OpInfo::new("RST 7", Arg::None), // 0xFF
];

/// Byte length of the instruction starting with `opcode`.
pub fn instruction_len(opcode: u8) -> u8 {
    OPCODES[opcode as usize].len()
}

/// Mnemonic (with register operands) for `opcode`.
pub fn mnemonic(opcode: u8) -> &'static str {
    OPCODES[opcode as usize].mnemonic.trim_end_matches([' ', ','])
}

/// One decoded instruction. Formatting does not allocate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Disassembly {
    pub opcode: u8,
    /// Inline operand bytes (pc+1, pc+2) as read; only the first `byte_len - 1`
    /// are meaningful.
    pub operands: [u8; 2],
}

impl Disassembly {
    pub fn byte_len(&self) -> u8 {
        instruction_len(self.opcode)
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &OPCODES[self.opcode as usize];
        let [lo, hi] = self.operands;
        match info.arg {
            Arg::None => f.write_str(info.mnemonic),
            Arg::Imm8 => write!(f, "{}#${lo:02X}", info.mnemonic),
            Arg::Port => write!(f, "{}${lo:02X}", info.mnemonic),
            Arg::Imm16 => write!(f, "{}#${:04X}", info.mnemonic, u16::from_le_bytes([lo, hi])),
            Arg::Addr16 => write!(f, "{}${:04X}", info.mnemonic, u16::from_le_bytes([lo, hi])),
        }
    }
}

/// Decode the instruction at the start of `bytes`. Missing bytes read as 0.
pub fn disassemble(bytes: &[u8]) -> Disassembly {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
    Disassembly {
        opcode: byte(0),
        operands: [byte(1), byte(2)],
    }
}
