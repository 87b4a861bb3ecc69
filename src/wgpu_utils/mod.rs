// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers for the wgpu operations the simulation and
//! presentation stages repeat: binding types, typed uniform buffers and
//! texture readback.

pub mod binding_types;
pub mod readback;
pub mod uniform_buffer;

// Re-export main types
pub use binding_types::*;
pub use readback::{padded_bytes_per_row, read_texture};
pub use uniform_buffer::UniformBuffer;
