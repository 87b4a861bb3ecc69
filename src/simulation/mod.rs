// src/simulation/mod.rs
//! Simulation system
//!
//! Game of Life state and stepping. [`gpu::GpuLife`] is the real driver;
//! [`cpu::CpuLife`] runs the same rule, seeding and ping-pong discipline on
//! the host and serves as the reference the GPU output is checked against.

pub mod cpu;
pub mod gpu;
pub mod grid;
pub mod hash;
pub mod patterns;
pub mod ping_pong;
pub mod rules;
