//! CPU reference simulator
//!
//! Sequential mirror of the GPU driver: the same seeding, the same rule, the
//! same ping-pong discipline. Every next state is computed from one fixed
//! snapshot of the current generation, which makes it the oracle the GPU path
//! is tested against.

use super::grid::{EdgePolicy, Generation, GridSize};
use super::patterns::seed_generation;
use super::ping_pong::PingPong;
use super::rules::evolve_cell;
use crate::config::LifeConfig;
use crate::error::{LifeError, Result};

/// Writes the successor of `current` into `next`
pub fn step_generation(current: &Generation, next: &mut Generation, policy: EdgePolicy) {
    let size = current.size();
    debug_assert_eq!(size, next.size());
    for y in 0..size.height() {
        for x in 0..size.width() {
            next.set(x, y, evolve_cell(current, x, y, policy));
        }
    }
}

/// Host-side Game of Life with two owned generation buffers
pub struct CpuLife {
    buffers: PingPong<Generation>,
    edge_policy: EdgePolicy,
    alive_threshold: f32,
    generation: u64,
}

impl CpuLife {
    /// Starts from the configured pattern
    pub fn new(config: &LifeConfig) -> Result<Self> {
        config.validate()?;
        let size = config.grid()?;
        let mut life = Self {
            buffers: PingPong::new(Generation::new(size), Generation::new(size)),
            edge_policy: config.edge_policy,
            alive_threshold: config.alive_threshold,
            generation: 0,
        };
        life.upload(&config.pattern.build(size, config.alive_threshold))?;
        Ok(life)
    }

    /// Starts from an explicit generation
    pub fn from_generation(initial: Generation, edge_policy: EdgePolicy) -> Self {
        let size = initial.size();
        Self {
            buffers: PingPong::new(initial, Generation::new(size)),
            edge_policy,
            alive_threshold: crate::config::DEFAULT_ALIVE_THRESHOLD,
            generation: 0,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.buffers.current().size()
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Updates applied since the last seed or upload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> &Generation {
        self.buffers.current()
    }

    pub fn population(&self) -> usize {
        self.current().population()
    }

    /// Hash-seeds generation 0
    pub fn seed(&mut self) {
        let seeded = seed_generation(self.grid(), self.alive_threshold);
        let (_, next) = self.buffers.split();
        *next = seeded;
        self.buffers.swap();
        self.generation = 0;
    }

    /// Replaces the state with a host snapshot of the same size
    pub fn upload(&mut self, generation: &Generation) -> Result<()> {
        let size = self.grid();
        if generation.size() != size {
            return Err(LifeError::PatternSize {
                width: size.width(),
                height: size.height(),
                got_width: generation.size().width(),
                got_height: generation.size().height(),
            });
        }
        let (_, next) = self.buffers.split();
        next.clone_from(generation);
        self.buffers.swap();
        self.generation = 0;
        Ok(())
    }

    /// Advances one tick
    pub fn step(&mut self) {
        let policy = self.edge_policy;
        let (current, next) = self.buffers.split();
        step_generation(current, next, policy);
        self.buffers.swap();
        self.generation += 1;
    }

    pub fn step_n(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::patterns::{stamp, LifePattern, BLINKER, BLOCK, GLIDER};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn size(w: u32, h: u32) -> GridSize {
        GridSize::new(w, h).unwrap()
    }

    fn with_pattern(grid: GridSize, cells: &[(u32, u32)], x: u32, y: u32) -> Generation {
        let mut generation = Generation::new(grid);
        stamp(&mut generation, cells, x, y);
        generation
    }

    #[test]
    fn test_block_is_still_life() {
        let initial = with_pattern(size(8, 8), &BLOCK, 3, 3);
        let mut life = CpuLife::from_generation(initial.clone(), EdgePolicy::Wrap);
        life.step();
        assert_eq!(life.current(), &initial);
        assert_eq!(life.generation(), 1);
    }

    #[test]
    fn test_blinker_oscillates_with_period_two() {
        let vertical = with_pattern(size(7, 7), &BLINKER, 2, 2);
        let horizontal = Generation::with_alive(size(7, 7), &[(2, 3), (3, 3), (4, 3)]);
        let mut life = CpuLife::from_generation(vertical.clone(), EdgePolicy::Wrap);

        life.step();
        assert_eq!(life.current(), &horizontal);
        life.step();
        assert_eq!(life.current(), &vertical);
    }

    #[test]
    fn test_glider_wraps_around_torus() {
        // A glider moves one cell diagonally every 4 ticks, so after 4 * 16
        // ticks on a 16x16 torus it is back where it started
        let initial = with_pattern(size(16, 16), &GLIDER, 6, 6);
        let mut life = CpuLife::from_generation(initial.clone(), EdgePolicy::Wrap);
        life.step_n(64);
        assert_eq!(life.current(), &initial);
    }

    #[test]
    fn test_glider_reenters_from_opposite_edge() {
        let grid = size(12, 10);
        let mut life = CpuLife::from_generation(with_pattern(grid, &GLIDER, 9, 7), EdgePolicy::Wrap);
        life.step_n(4 * 5);

        // Shifted by (5, 5) with coordinates reduced modulo the grid
        let expected: Vec<(u32, u32)> = GLIDER
            .iter()
            .map(|&(dx, dy)| ((9 + dx + 5) % 12, (7 + dy + 5) % 10))
            .collect();
        assert_eq!(life.current(), &Generation::with_alive(grid, &expected));
    }

    #[test]
    fn test_lone_cell_dies_under_wrap_and_survives_clamped_corner() {
        let initial = Generation::with_alive(size(4, 4), &[(0, 0)]);

        let mut wrapped = CpuLife::from_generation(initial.clone(), EdgePolicy::Wrap);
        wrapped.step();
        assert_eq!(wrapped.population(), 0);

        let mut clamped = CpuLife::from_generation(initial.clone(), EdgePolicy::Clamp);
        clamped.step_n(3);
        assert_eq!(clamped.current(), &initial);
    }

    #[test]
    fn test_update_is_independent_of_evaluation_order() {
        let grid = size(32, 24);
        let mut rng = StdRng::seed_from_u64(0x11fe);
        let mut current = Generation::new(grid);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                current.set(x, y, rng.random_bool(0.35));
            }
        }

        let mut reference = Generation::new(grid);
        step_generation(&current, &mut reference, EdgePolicy::Wrap);

        let mut order: Vec<(u32, u32)> = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
            .collect();
        for _ in 0..5 {
            order.shuffle(&mut rng);
            let mut next = Generation::new(grid);
            for &(x, y) in &order {
                next.set(x, y, evolve_cell(&current, x, y, EdgePolicy::Wrap));
            }
            assert_eq!(next, reference);
        }
    }

    #[test]
    fn test_in_place_update_diverges_from_reference() {
        let grid = size(32, 32);
        let current = seed_generation(grid, 0.7);
        let mut reference = Generation::new(grid);
        step_generation(&current, &mut reference, EdgePolicy::Wrap);

        let mut in_place = current.clone();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let next = evolve_cell(&in_place, x, y, EdgePolicy::Wrap);
                in_place.set(x, y, next);
            }
        }
        assert_ne!(in_place, reference);
    }

    #[test]
    fn test_new_uses_configured_pattern() {
        let config = LifeConfig::default()
            .with_size(20, 20)
            .with_pattern(LifePattern::Glider);
        let life = CpuLife::new(&config).unwrap();
        assert_eq!(life.population(), 5);
        assert_eq!(life.generation(), 0);
    }

    #[test]
    fn test_seed_resets_generation() {
        let config = LifeConfig::default().with_size(64, 64);
        let mut life = CpuLife::new(&config).unwrap();
        life.step_n(3);
        life.seed();
        assert_eq!(life.generation(), 0);
        assert_eq!(life.current(), &seed_generation(life.grid(), 0.9));
    }

    #[test]
    fn test_upload_rejects_wrong_size() {
        let mut life = CpuLife::from_generation(Generation::new(size(8, 8)), EdgePolicy::Wrap);
        let err = life.upload(&Generation::new(size(4, 8))).unwrap_err();
        assert!(matches!(err, LifeError::PatternSize { got_width: 4, .. }));
    }
}
