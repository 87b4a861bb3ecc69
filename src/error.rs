//! # Error Types
//!
//! Every fallible operation in the crate returns [`LifeError`].

use thiserror::Error;

/// Main error type for simulation and rendering operations
#[derive(Error, Debug)]
pub enum LifeError {
    /// Configuration rejected before any GPU resource was created
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A shader stage failed to compile or link
    #[error("Shader '{label}' failed to build: {message}")]
    Shader { label: String, message: String },

    /// No adapter matched the request
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// The adapter refused to create a device
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The window surface could not be created
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// The surface cannot be presented to by this adapter
    #[error("Unsupported surface: {0}")]
    Surface(String),

    /// The device was lost; both generation images must be rebuilt and re-seeded
    #[error("GPU device lost: {0}")]
    DeviceLost(String),

    /// Reading a generation back from the GPU failed
    #[error("Readback failed: {0}")]
    Readback(String),

    /// A host snapshot does not match the simulation grid
    #[error("Generation is {got_width}x{got_height}, expected {width}x{height}")]
    PatternSize {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },

    /// Window system failure
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LifeError>;
