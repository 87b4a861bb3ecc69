// src/lib.rs
//! Haggis Life
//!
//! Conway's Game of Life resident on the GPU, built on wgpu compute shaders
//! and a winit viewer.
//!
//! The grid lives in two images used in ping-pong fashion: each tick reads
//! one and writes the other, then the roles swap. A host-side reference
//! ([`simulation::cpu::CpuLife`]) runs the same rule for testing and offline
//! comparison.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod shaders;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LifeApp;
pub use config::LifeConfig;
pub use error::{LifeError, Result};

/// Opens the viewer with the default configuration and blocks until it closes
pub fn run_default() -> Result<()> {
    LifeApp::new(LifeConfig::default())?.run()
}
