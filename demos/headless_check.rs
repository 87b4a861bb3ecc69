//! # Conway's Game of Life - Headless Check
//!
//! Runs the GPU driver without a window and compares every generation with
//! the CPU reference.
//!
//! ```text
//! cargo run --example headless_check -- [ticks]
//! ```

use anyhow::{bail, Context};
use haggis_life::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ticks: u32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("ticks must be a number")?,
        None => 100,
    };

    let config = LifeConfig::default().with_size(256, 192).with_alive_threshold(0.7);
    let context = GpuContext::headless().context("no GPU adapter available")?;
    let mut gpu = GpuLife::new(&context, &config)?;
    gpu.seed()?;

    let mut cpu = CpuLife::new(&config)?;
    if gpu.read_current()? != *cpu.current() {
        bail!("seeded generations differ");
    }

    for tick in 1..=ticks {
        gpu.step()?;
        cpu.step();
        let gpu_state = gpu.read_current()?;
        if gpu_state != *cpu.current() {
            let mismatched = (0..config.height)
                .flat_map(|y| (0..config.width).map(move |x| (x, y)))
                .filter(|&(x, y)| gpu_state.get(x, y) != cpu.current().get(x, y))
                .count();
            bail!("generation {tick}: {mismatched} cells differ from the CPU reference");
        }
        if tick % 25 == 0 {
            log::info!("Generation {tick}: {} live cells", cpu.population());
        }
    }

    log::info!("GPU matched the CPU reference for {ticks} generations");
    Ok(())
}
