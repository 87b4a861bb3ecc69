//! # Simulation Configuration
//!
//! Every tunable the automaton exposes lives in [`LifeConfig`]. Nothing in
//! the compute or render path hardcodes grid size, seeding density, tick
//! rate or boundary handling; they flow from here into the GPU uniform.
//!
//! ## Usage
//!
//! ```no_run
//! use haggis_life::config::LifeConfig;
//! use haggis_life::simulation::grid::EdgePolicy;
//!
//! let config = LifeConfig::default()
//!     .with_size(256, 144)
//!     .with_alive_threshold(0.85)
//!     .with_tick_rate(30.0)
//!     .with_edge_policy(EdgePolicy::Wrap);
//! config.validate().unwrap();
//! ```

use crate::error::{LifeError, Result};
use crate::simulation::grid::{EdgePolicy, GridSize};
use crate::simulation::patterns::LifePattern;

/// Default seeding threshold: a cell starts alive when its random value exceeds this
pub const DEFAULT_ALIVE_THRESHOLD: f32 = 0.9;

/// Default grid, 16:9 like the window
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

/// Ticks the app will run in a single frame before dropping the backlog
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Host-facing configuration for one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Seeding threshold in [0, 1]; alive iff `random_float(seed) > threshold`
    pub alive_threshold: f32,
    /// Generations per second while running
    pub tick_rate: f32,
    /// Neighbor addressing at the grid boundary
    pub edge_policy: EdgePolicy,
    /// Start with the clock stopped; stepping is then manual
    pub start_paused: bool,
    /// Initial state loaded at startup and on reseed
    pub pattern: LifePattern,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            alive_threshold: DEFAULT_ALIVE_THRESHOLD,
            tick_rate: 10.0,
            edge_policy: EdgePolicy::Wrap,
            start_paused: false,
            pattern: LifePattern::Random,
        }
    }
}

impl LifeConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_alive_threshold(mut self, threshold: f32) -> Self {
        self.alive_threshold = threshold;
        self
    }

    pub fn with_tick_rate(mut self, generations_per_second: f32) -> Self {
        self.tick_rate = generations_per_second;
        self
    }

    pub fn with_edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }

    pub fn with_start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    pub fn with_pattern(mut self, pattern: LifePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Grid dimensions as a validated [`GridSize`]
    pub fn grid(&self) -> Result<GridSize> {
        GridSize::new(self.width, self.height)
    }

    /// Seconds between two generations
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Checks every field; called by every constructor that consumes a config
    pub fn validate(&self) -> Result<()> {
        self.grid()?;

        if !(0.0..=1.0).contains(&self.alive_threshold) {
            return Err(LifeError::InvalidConfig(format!(
                "alive_threshold must lie in [0, 1], got {}",
                self.alive_threshold
            )));
        }

        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(LifeError::InvalidConfig(format!(
                "tick_rate must be a positive number of generations per second, got {}",
                self.tick_rate
            )));
        }

        Ok(())
    }

    /// Rejects grids the device cannot hold in a single 2D image
    pub fn validate_for_limits(&self, limits: &wgpu::Limits) -> Result<()> {
        self.validate()?;
        let max = limits.max_texture_dimension_2d;
        if self.width > max || self.height > max {
            return Err(LifeError::InvalidConfig(format!(
                "grid {}x{} exceeds the device's max texture dimension {}",
                self.width, self.height, max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LifeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alive_threshold, DEFAULT_ALIVE_THRESHOLD);
        assert_eq!(config.edge_policy, EdgePolicy::Wrap);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = LifeConfig::default()
            .with_size(64, 32)
            .with_alive_threshold(0.5)
            .with_tick_rate(4.0)
            .with_edge_policy(EdgePolicy::Clamp)
            .with_start_paused(true)
            .with_pattern(LifePattern::Glider);

        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.alive_threshold, 0.5);
        assert_eq!(config.tick_interval(), 0.25);
        assert_eq!(config.edge_policy, EdgePolicy::Clamp);
        assert!(config.start_paused);
        assert_eq!(config.pattern, LifePattern::Glider);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = LifeConfig::default().with_size(0, 16);
        assert!(matches!(config.validate(), Err(LifeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        assert!(LifeConfig::default().with_alive_threshold(1.5).validate().is_err());
        assert!(LifeConfig::default().with_alive_threshold(-0.1).validate().is_err());
        assert!(LifeConfig::default().with_alive_threshold(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_tick_rate() {
        assert!(LifeConfig::default().with_tick_rate(0.0).validate().is_err());
        assert!(LifeConfig::default().with_tick_rate(f32::INFINITY).validate().is_err());
    }

    #[test]
    fn test_rejects_grid_beyond_texture_limit() {
        let limits = wgpu::Limits::downlevel_defaults();
        let too_wide = limits.max_texture_dimension_2d + 1;
        let config = LifeConfig::default().with_size(too_wide, 8);
        assert!(config.validate_for_limits(&limits).is_err());
        assert!(LifeConfig::default().validate_for_limits(&limits).is_ok());
    }
}
