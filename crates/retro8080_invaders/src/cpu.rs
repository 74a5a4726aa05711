mod alu;
mod exec;
mod interrupts;
mod regs;

pub use alu::parity;
pub use interrupts::InterruptController;
pub use regs::{Condition, Flags, Operand, RegisterPair, Registers, StatusBits};

/// Simple bus interface for an Intel 8080-compatible CPU core.
///
/// The CPU uses this trait to access memory and IO ports without knowing
/// anything about the concrete machine (Space Invaders in our case).
pub trait Bus8080 {
    fn mem_read(&mut self, addr: u16) -> u8;
    fn mem_write(&mut self, addr: u16, value: u8);

    fn io_read(&mut self, port: u8) -> u8;
    fn io_write(&mut self, port: u8, value: u8);
}

/// Execution state of the processor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    #[default]
    Running,
    /// Entered through HLT. Only `reset` leaves this state.
    Halted,
}

/// Intel 8080 CPU core.
///
/// One call to [`Cpu8080::step`] executes exactly one instruction (or one
/// injected interrupt opcode) and reports the cycles it took. The driver is
/// responsible for accumulating cycles and requesting interrupts.
pub struct Cpu8080 {
    pub regs: Registers,
    pub flags: Flags,
    interrupts: InterruptController,
    state: RunState,
    /// Cleared while an injected interrupt opcode executes, so the opcode does
    /// not consume a byte from memory.
    update_pc: bool,
    hits: [u64; 256],
}

impl Default for Cpu8080 {
    fn default() -> Self {
        Self {
            regs: Registers::default(),
            flags: Flags::default(),
            interrupts: InterruptController::default(),
            state: RunState::Running,
            update_pc: true,
            hits: [0; 256],
        }
    }
}

impl Cpu8080 {
    /// Create a new CPU instance in reset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CPU that starts fetching at `pc`.
    pub fn with_pc(pc: u16) -> Self {
        let mut cpu = Self::default();
        cpu.regs.pc = pc;
        cpu
    }

    /// Reset all processor state and restart execution at `pc`.
    pub fn reset(&mut self, pc: u16) {
        *self = Self::with_pc(pc);
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts.is_enabled()
    }

    pub fn interrupt_pending(&self) -> Option<u8> {
        self.interrupts.pending()
    }

    /// Latch an interrupt request carrying `opcode` (normally an RST).
    ///
    /// The request is delivered on the next fetch with interrupts enabled.
    /// A second request before delivery replaces the first.
    pub fn request_interrupt(&mut self, opcode: u8) {
        self.interrupts.request(opcode);
    }

    /// Per-opcode execution counters, indexed by opcode.
    pub fn opcode_hits(&self) -> &[u64; 256] {
        &self.hits
    }

    /// Execute a single instruction and return the number of cycles consumed.
    ///
    /// A halted CPU does nothing and reports 0 cycles.
    pub fn step<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        if self.is_halted() {
            return 0;
        }

        let opcode = match self.interrupts.take() {
            Some(opcode) => {
                log::debug!(
                    "8080 interrupt: opcode=0x{opcode:02X} pc=0x{pc:04X} sp=0x{sp:04X}",
                    pc = self.regs.pc,
                    sp = self.regs.sp,
                );
                self.update_pc = false;
                opcode
            }
            None => {
                self.update_pc = true;
                bus.mem_read(self.regs.pc)
            }
        };

        self.hits[opcode as usize] = self.hits[opcode as usize].saturating_add(1);
        self.exec_opcode(bus, opcode)
    }

    /// Raw byte at `pc + offset`. Does not move the program counter.
    pub fn immediate<B: Bus8080>(&self, bus: &mut B, offset: u16) -> u8 {
        bus.mem_read(self.regs.pc.wrapping_add(offset))
    }

    /// Little-endian word following the current opcode (pc+1 low, pc+2 high).
    pub fn address<B: Bus8080>(&self, bus: &mut B) -> u16 {
        let lo = self.immediate(bus, 1);
        let hi = self.immediate(bus, 2);
        u16::from_le_bytes([lo, hi])
    }

    /// Read an 8-bit operand; `M` resolves through memory at HL.
    pub fn get_operand<B: Bus8080>(&self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::B => self.regs.b,
            Operand::C => self.regs.c,
            Operand::D => self.regs.d,
            Operand::E => self.regs.e,
            Operand::H => self.regs.h,
            Operand::L => self.regs.l,
            Operand::M => bus.mem_read(self.regs.hl()),
            Operand::A => self.regs.a,
        }
    }

    /// Write an 8-bit operand; `M` resolves through memory at HL.
    pub fn set_operand<B: Bus8080>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::B => self.regs.b = value,
            Operand::C => self.regs.c = value,
            Operand::D => self.regs.d = value,
            Operand::E => self.regs.e = value,
            Operand::H => self.regs.h = value,
            Operand::L => self.regs.l = value,
            Operand::M => bus.mem_write(self.regs.hl(), value),
            Operand::A => self.regs.a = value,
        }
    }

    /// Move the program counter past an instruction of `len` bytes, unless the
    /// current opcode was injected by an interrupt. Returns the resulting pc.
    fn advance_pc(&mut self, len: u16) -> u16 {
        if self.update_pc {
            self.regs.pc = self.regs.pc.wrapping_add(len);
        }
        self.regs.pc
    }

    fn push<B: Bus8080>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        bus.mem_write(self.regs.sp.wrapping_add(1), hi);
        bus.mem_write(self.regs.sp, lo);
    }

    fn pop<B: Bus8080>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.mem_read(self.regs.sp);
        let hi = bus.mem_read(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    fn condition(&self, condition: Condition) -> bool {
        match condition {
            Condition::NotZero => !self.flags.zero,
            Condition::Zero => self.flags.zero,
            Condition::NoCarry => !self.flags.carry,
            Condition::Carry => self.flags.carry,
            Condition::ParityOdd => !self.flags.parity,
            Condition::ParityEven => self.flags.parity,
            Condition::Plus => !self.flags.sign,
            Condition::Minus => self.flags.sign,
        }
    }
}

#[cfg(test)]
mod tests;
