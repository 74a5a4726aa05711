use typed_builder::TypedBuilder;

use crate::io::DipConfig;

/// 8080 clock and frame timing for Space Invaders.
pub const CPU_CLOCK_HZ: u32 = 2_000_000;
pub const FRAME_RATE_HZ: u32 = 60;

/// RST 1 (mid-screen) and RST 2 (vblank).
pub const DEFAULT_INTERRUPT_OPCODES: [u8; 2] = [0xCF, 0xD7];

/// Bytes of program image mapped at 0x0000.
pub const ROM_LIMIT: usize = 0x2400;
/// Writes below this address are rejected.
pub const PROTECTED_BOUNDARY: u16 = 0x2000;

/// Machine setup. `MachineConfig::builder().build()` is the arcade board.
#[derive(Clone, Debug, TypedBuilder)]
pub struct MachineConfig {
    #[builder(default = CPU_CLOCK_HZ)]
    pub clock_hz: u32,
    #[builder(default = FRAME_RATE_HZ)]
    pub frame_rate_hz: u32,
    /// Opcodes injected in turn, evenly spaced across each frame.
    #[builder(default = DEFAULT_INTERRUPT_OPCODES.to_vec())]
    pub interrupt_opcodes: Vec<u8>,
    #[builder(default = ROM_LIMIT)]
    pub image_limit: usize,
    #[builder(default = PROTECTED_BOUNDARY)]
    pub protected_boundary: u16,
    /// Turn protected writes into errors instead of warnings.
    #[builder(default = false)]
    pub strict_memory: bool,
    #[builder(default)]
    pub dip: DipConfig,
    #[builder(default = 0x0000)]
    pub start_pc: u16,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MachineConfig {
    pub fn cycles_per_frame(&self) -> u64 {
        u64::from(self.clock_hz) / u64::from(self.frame_rate_hz.max(1))
    }

    /// Cycles between two interrupt requests, or `None` when interrupts are
    /// not scheduled.
    pub fn interrupt_interval(&self) -> Option<u64> {
        let count = self.interrupt_opcodes.len() as u64;
        if count == 0 {
            return None;
        }
        Some((self.cycles_per_frame() / count).max(1))
    }
}
