use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use retro8080_invaders::video::{self, VRAM_SIZE, VRAM_START};
use retro8080_invaders::{MachineConfig, RunSummary, SpaceInvadersMachine};

/// Frames run when no budget is given (10 seconds of game time).
pub const DEFAULT_FRAMES: u64 = 600;

/// How long to run the machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Budget {
    Frames(u64),
    Cycles(u64),
}

#[derive(Parser, Clone, Debug, PartialEq)]
#[command(
    name = "retro8080",
    about = "Run a Space Invaders ROM on the retro8080 core without a display."
)]
pub struct RunOptions {
    /// ROM image loaded at address 0.
    #[arg(value_name = "ROM")]
    pub rom_path: PathBuf,

    /// Number of 60 Hz frames to run.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Number of CPU cycles to run instead of whole frames.
    #[arg(long, value_name = "N", conflicts_with = "frames")]
    pub cycles: Option<u64>,

    /// Stop on the first write into the protected ROM area.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Raw video RAM dump.
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Opcode hit counts.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// PBM snapshot of the screen.
    #[arg(long, value_name = "FILE")]
    pub screenshot: Option<PathBuf>,
}

impl RunOptions {
    pub fn budget(&self) -> Budget {
        match (self.frames, self.cycles) {
            (_, Some(cycles)) => Budget::Cycles(cycles),
            (Some(frames), None) => Budget::Frames(frames),
            (None, None) => Budget::Frames(DEFAULT_FRAMES),
        }
    }
}

/// Load the ROM, run it for the requested budget and write the requested
/// diagnostics.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let config = MachineConfig::builder().strict_memory(options.strict).build();
    let mut machine = SpaceInvadersMachine::from_rom_file(&options.rom_path, config)
        .with_context(|| format!("failed to load ROM '{}'", options.rom_path.display()))?;

    let summary = run_machine(&mut machine, options.budget())?;
    log::info!(
        "run finished: {} cycles, {} instructions, {} interrupts, halted={}",
        summary.cycles,
        summary.instructions,
        summary.interrupts,
        summary.halted
    );

    if let Some(path) = &options.dump {
        machine
            .dump_range(path, VRAM_START..VRAM_START + VRAM_SIZE)
            .with_context(|| format!("failed to write memory dump '{}'", path.display()))?;
    }
    if let Some(path) = &options.report {
        let file = File::create(path)
            .with_context(|| format!("failed to create report '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        machine
            .write_opcode_report(&mut out)
            .and_then(|()| out.flush().map_err(Into::into))
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
    }
    if let Some(path) = &options.screenshot {
        let file = File::create(path)
            .with_context(|| format!("failed to create screenshot '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        video::write_pbm(machine.video_ram(), &mut out)
            .and_then(|()| out.flush())
            .with_context(|| format!("failed to write screenshot '{}'", path.display()))?;
    }

    Ok(summary)
}

fn run_machine(machine: &mut SpaceInvadersMachine, budget: Budget) -> Result<RunSummary> {
    match budget {
        Budget::Frames(frames) => {
            for frame in 0..frames {
                let outcome = machine
                    .step_frame()
                    .with_context(|| format!("emulation stopped in frame {frame}"))?;
                let sounds = machine.drain_sounds();
                if !sounds.is_empty() {
                    log::debug!("frame {frame}: sounds {sounds:?}");
                }
                if outcome.halted {
                    log::info!("CPU halted in frame {frame}");
                    break;
                }
            }
            Ok(machine.summary())
        }
        Budget::Cycles(cycles) => machine.run_for(cycles).context("emulation stopped"),
    }
}
