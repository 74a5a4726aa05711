use anyhow::Result;
use clap::Parser;
use retro8080::RunOptions;

fn main() -> Result<()> {
    env_logger::init();

    let options = RunOptions::parse();
    log::info!("Running ROM path: '{}'", options.rom_path.display());

    let summary = retro8080::run(&options)?;
    println!(
        "cycles={} instructions={} interrupts={} halted={}",
        summary.cycles, summary.instructions, summary.interrupts, summary.halted
    );
    Ok(())
}
