// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the window surface, the presentation pipeline and frame submission.

pub mod life_renderer;
pub mod render_engine;

// Re-export main types
pub use life_renderer::LifeRenderer;
pub use render_engine::RenderEngine;
