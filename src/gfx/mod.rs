//! # Graphics Module
//!
//! Device acquisition and presentation for the Game of Life viewer.
//!
//! - **Context** ([`context`]) - adapter, device and queue, plus device-loss tracking
//! - **Rendering** ([`rendering`]) - window surface and the full-screen generation quad
//!
//! The compute side lives in [`crate::simulation::gpu`]; it borrows a
//! [`GpuContext`] from here and never touches the surface.

pub mod context;
pub mod rendering;

// Re-export commonly used types
pub use context::GpuContext;
pub use rendering::life_renderer::LifeRenderer;
pub use rendering::render_engine::RenderEngine;
