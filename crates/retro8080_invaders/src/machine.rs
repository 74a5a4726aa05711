use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use crate::config::MachineConfig;
use crate::cpu::{Bus8080, Cpu8080};
use crate::disasm;
use crate::error::EmulatorError;
use crate::io::{DipConfig, Input, InvadersIo, SoundEffect};
use crate::memory::Memory;
use crate::video::{VRAM_SIZE, VRAM_START};

/// Bus seen by the CPU: memory plus the port device.
///
/// Protected writes are always dropped. In strict mode the first one is
/// latched until the machine picks it up after the current instruction.
struct InvadersBus {
    memory: Memory,
    io: InvadersIo,
    strict: bool,
    fault: Option<EmulatorError>,
    /// Address of the instruction being executed.
    pc: u16,
}

impl Bus8080 for InvadersBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        if let Err(err) = self.memory.write(addr, value) {
            log::warn!("{err} at pc=0x{:04X}, ignored", self.pc);
            if self.strict && self.fault.is_none() {
                self.fault = Some(err);
            }
        }
    }

    fn io_read(&mut self, port: u8) -> u8 {
        self.io.read(port)
    }

    fn io_write(&mut self, port: u8, value: u8) {
        self.io.write(port, value);
    }
}

/// Result of [`SpaceInvadersMachine::step_frame`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameOutcome {
    pub cycles: u64,
    pub halted: bool,
}

/// Counters for a stretch of execution.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub cycles: u64,
    pub instructions: u64,
    pub interrupts: u64,
    pub halted: bool,
}

/// The Space Invaders board: an 8080, 64 KiB of memory, the port device and
/// the video interrupt schedule.
pub struct SpaceInvadersMachine {
    cpu: Cpu8080,
    bus: InvadersBus,
    config: MachineConfig,
    interval: Option<u64>,
    cycles: u64,
    instructions: u64,
    interrupts: u64,
    next_interrupt: u64,
    next_vector: usize,
    next_frame: u64,
}

impl SpaceInvadersMachine {
    /// Construct a machine with empty memory.
    pub fn new(config: MachineConfig) -> Self {
        let interval = config.interrupt_interval();
        let machine = Self {
            cpu: Cpu8080::with_pc(config.start_pc),
            bus: InvadersBus {
                memory: Memory::new(config.protected_boundary),
                io: InvadersIo::new(config.dip),
                strict: config.strict_memory,
                fault: None,
                pc: config.start_pc,
            },
            interval,
            cycles: 0,
            instructions: 0,
            interrupts: 0,
            next_interrupt: interval.unwrap_or(0),
            next_vector: 0,
            next_frame: config.cycles_per_frame(),
            config,
        };
        log::info!(
            "8080 machine init: clock={}Hz frame={}Hz interrupts={:02X?} strict={}",
            machine.config.clock_hz,
            machine.config.frame_rate_hz,
            machine.config.interrupt_opcodes,
            machine.config.strict_memory,
        );
        machine
    }

    /// Construct a machine and load the program image at `path`.
    pub fn from_rom_file(
        path: impl AsRef<Path>,
        config: MachineConfig,
    ) -> Result<Self, EmulatorError> {
        let path = path.as_ref();
        let image = fs::read(path).map_err(|source| EmulatorError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut machine = Self::new(config);
        machine.load_rom(&image);
        log::info!("loaded {} ({} bytes)", path.display(), image.len());
        Ok(machine)
    }

    /// Load a program image at 0x0000 and point the CPU at the start address.
    pub fn load_rom(&mut self, rom: &[u8]) {
        self.bus.memory.load_image(rom, self.config.image_limit);
        self.cpu.regs.pc = self.config.start_pc;
    }

    /// Reset CPU, ports and timing. Memory contents are kept.
    pub fn reset(&mut self) {
        self.cpu.reset(self.config.start_pc);
        self.bus.io.reset();
        self.bus.fault = None;
        self.cycles = 0;
        self.instructions = 0;
        self.interrupts = 0;
        self.next_interrupt = self.interval.unwrap_or(0);
        self.next_vector = 0;
        self.next_frame = self.config.cycles_per_frame();
        log::info!("8080 machine reset, pc=0x{:04X}", self.config.start_pc);
    }

    /// Execute one instruction and fire the next interrupt request if its
    /// cycle deadline has passed.
    ///
    /// In strict mode a protected write made by the instruction is returned
    /// as an error after the instruction has completed.
    pub fn step(&mut self) -> Result<u32, EmulatorError> {
        if log::log_enabled!(log::Level::Trace) {
            self.trace_instruction();
        }

        self.bus.pc = self.cpu.regs.pc;
        let cycles = self.cpu.step(&mut self.bus);
        if cycles > 0 {
            self.cycles += u64::from(cycles);
            self.instructions += 1;
        }
        self.schedule_interrupt();

        match self.bus.fault.take() {
            Some(err) => Err(err),
            None => Ok(cycles),
        }
    }

    /// Run until the end of the current video frame or until the CPU halts.
    pub fn step_frame(&mut self) -> Result<FrameOutcome, EmulatorError> {
        let start = self.cycles;
        while self.cycles < self.next_frame && !self.cpu.is_halted() {
            self.step()?;
        }
        if self.cycles >= self.next_frame {
            self.next_frame += self.config.cycles_per_frame().max(1);
        }
        Ok(FrameOutcome {
            cycles: self.cycles - start,
            halted: self.cpu.is_halted(),
        })
    }

    /// Run for at least `budget` cycles, stopping early if the CPU halts.
    pub fn run_for(&mut self, budget: u64) -> Result<RunSummary, EmulatorError> {
        let before = self.summary();
        let target = self.cycles.saturating_add(budget);
        while self.cycles < target && !self.cpu.is_halted() {
            self.step()?;
        }
        let after = self.summary();
        Ok(RunSummary {
            cycles: after.cycles - before.cycles,
            instructions: after.instructions - before.instructions,
            interrupts: after.interrupts - before.interrupts,
            halted: after.halted,
        })
    }

    /// Totals since construction or the last reset.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            cycles: self.cycles,
            instructions: self.instructions,
            interrupts: self.interrupts,
            halted: self.cpu.is_halted(),
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu8080 {
        &self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.bus.memory
    }

    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The raw video RAM window, 0x1c00 bytes from 0x2400.
    pub fn video_ram(&self) -> &[u8] {
        self.bus.memory.slice(VRAM_START..VRAM_START + VRAM_SIZE)
    }

    pub fn set_input(&mut self, input: Input, pressed: bool) {
        self.bus.io.set_input(input, pressed);
    }

    pub fn set_dip_config(&mut self, dip: DipConfig) {
        self.config.dip = dip;
        self.bus.io.set_dip_config(dip);
    }

    /// Sound effects triggered since the last call.
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        self.bus.io.drain_sounds()
    }

    /// Current values of the sound output ports (OUT 3, OUT 5).
    pub fn outputs(&self) -> (u8, u8) {
        self.bus.io.outputs()
    }

    /// Unfinished line on the debug port 0; completed lines are logged.
    pub fn debug_text(&self) -> &str {
        self.bus.io.debug_text()
    }

    /// Write one `opcode<TAB>count` line per opcode, 0x00 through 0xFF.
    pub fn write_opcode_report<W: Write>(&self, mut out: W) -> Result<(), EmulatorError> {
        for (opcode, count) in self.cpu.opcode_hits().iter().enumerate() {
            writeln!(out, "{opcode:02X}\t{count}")?;
        }
        Ok(())
    }

    /// Write a raw copy of `range` to `path`.
    pub fn dump_range(
        &self,
        path: impl AsRef<Path>,
        range: Range<usize>,
    ) -> Result<(), EmulatorError> {
        let bytes = self.bus.memory.slice(range);
        fs::write(path.as_ref(), bytes)?;
        log::debug!("dumped {} bytes to {}", bytes.len(), path.as_ref().display());
        Ok(())
    }

    fn schedule_interrupt(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };
        if self.cycles < self.next_interrupt {
            return;
        }
        if let Some(&opcode) = self.config.interrupt_opcodes.get(self.next_vector) {
            log::debug!("interrupt request 0x{opcode:02X} at cycle {}", self.cycles);
            self.cpu.request_interrupt(opcode);
            self.interrupts += 1;
        }
        self.next_vector = (self.next_vector + 1) % self.config.interrupt_opcodes.len();
        self.next_interrupt += interval;
    }

    fn trace_instruction(&self) {
        let regs = &self.cpu.regs;
        if self.cpu.interrupts_enabled() {
            if let Some(opcode) = self.cpu.interrupt_pending() {
                log::trace!("{:04X}  <interrupt {}>", regs.pc, disasm::mnemonic(opcode));
                return;
            }
        }
        let mem = &self.bus.memory;
        let bytes = [
            mem.read(regs.pc),
            mem.read(regs.pc.wrapping_add(1)),
            mem.read(regs.pc.wrapping_add(2)),
        ];
        let insn = disasm::disassemble(&bytes);
        let raw = &bytes[..usize::from(insn.byte_len())];
        log::trace!(
            "{:04X}  {raw:02X?}  {insn}  A={:02X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} F={:02X}",
            regs.pc,
            regs.a,
            regs.bc(),
            regs.de(),
            regs.hl(),
            regs.sp,
            self.cpu.flags.to_byte(),
        );
    }
}

impl Default for SpaceInvadersMachine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}
