//! # Conway's Game of Life - GPU Viewer
//!
//! Opens a window showing a GPU-resident Game of Life.
//!
//! ## Controls
//!
//! - `Space` pause / resume
//! - `Right` single step while paused
//! - `R` reseed with the starting pattern
//! - Left click sets the cell under the cursor alive
//! - `Esc` quit
//!
//! ## Usage
//!
//! ```text
//! cargo run --example game_of_life -- [pattern] [edge-policy]
//! RUST_LOG=debug cargo run --example game_of_life -- gosper-gun clamp
//! ```

use anyhow::Context;
use haggis_life::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let pattern = match args.next() {
        Some(name) => name.parse::<LifePattern>()?,
        None => LifePattern::Random,
    };
    let edge_policy = match args.next() {
        Some(name) => name.parse::<EdgePolicy>()?,
        None => EdgePolicy::Wrap,
    };

    let config = LifeConfig::default()
        .with_size(640, 360)
        .with_tick_rate(20.0)
        .with_pattern(pattern)
        .with_edge_policy(edge_policy);
    log::info!(
        "Starting {} on a {}x{} grid with {} edges",
        pattern.as_str(),
        config.width,
        config.height,
        edge_policy.as_str()
    );

    LifeApp::new(config)
        .context("failed to set up the viewer")?
        .run()
        .context("viewer exited with an error")?;
    Ok(())
}
