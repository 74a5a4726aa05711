pub mod config;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod io;
pub mod machine;
pub mod memory;
pub mod video;

pub use config::MachineConfig;
pub use cpu::{Bus8080, Cpu8080};
pub use error::EmulatorError;
pub use io::{DipConfig, Input, SoundEffect};
pub use machine::{FrameOutcome, RunSummary, SpaceInvadersMachine};
pub use video::{SCREEN_HEIGHT, SCREEN_WIDTH};
