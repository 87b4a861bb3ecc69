//! Stateless pseudo-randomness for seeding
//!
//! The same mixing steps are written in WGSL in [`crate::shaders`]; the two
//! must stay in lockstep so a CPU-seeded grid equals a GPU-seeded one.

/// Avalanche hash: xorshift plus odd-constant multiply, three rounds
pub fn hash(value: u32) -> u32 {
    let mut state = value;
    state ^= 2747636419;
    state = state.wrapping_mul(2654435769);
    state ^= state >> 16;
    state = state.wrapping_mul(2654435769);
    state ^= state >> 16;
    state = state.wrapping_mul(2654435769);
    state
}

/// Uniform float in [0, 1) from the top 24 bits of [`hash`]
///
/// Divides by 2^24 rather than by `u32::MAX` as a plain `hash / (2^32 - 1)` would.
///
/// 24 bits convert to f32 exactly, so the value is bit-identical on every
/// backend and never rounds up to 1.0.
pub fn random_float(value: u32) -> f32 {
    (hash(value) >> 8) as f32 * (1.0 / 16_777_216.0)
}
