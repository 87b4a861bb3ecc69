//! Classic Game of Life starting patterns

use std::str::FromStr;

use super::grid::{Generation, GridSize};
use super::hash::random_float;
use crate::error::LifeError;

/// Glider heading towards +x, +y
pub const GLIDER: [(u32, u32); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// Vertical blinker (period 2)
pub const BLINKER: [(u32, u32); 3] = [(1, 0), (1, 1), (1, 2)];

/// 2x2 block still life
pub const BLOCK: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Gosper glider gun, 36x9 bounding box
pub const GOSPER_GUN: [(u32, u32); 36] = [
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LifePattern {
    /// Hash-seeded noise, identical to the GPU `init` dispatch
    #[default]
    Random,
    Glider,
    Blinker,
    Block,
    GosperGun,
    Clear,
}

impl LifePattern {
    pub const ALL: [LifePattern; 6] = [
        LifePattern::Random,
        LifePattern::Glider,
        LifePattern::Blinker,
        LifePattern::Block,
        LifePattern::GosperGun,
        LifePattern::Clear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifePattern::Random => "Random",
            LifePattern::Glider => "Glider",
            LifePattern::Blinker => "Blinker",
            LifePattern::Block => "Block",
            LifePattern::GosperGun => "Gosper Gun",
            LifePattern::Clear => "Clear",
        }
    }

    /// Alive offsets relative to the pattern's top-left corner
    pub fn cells(&self) -> &'static [(u32, u32)] {
        match self {
            LifePattern::Glider => &GLIDER,
            LifePattern::Blinker => &BLINKER,
            LifePattern::Block => &BLOCK,
            LifePattern::GosperGun => &GOSPER_GUN,
            LifePattern::Random | LifePattern::Clear => &[],
        }
    }

    /// Bounding box of [`Self::cells`]
    pub fn extent(&self) -> (u32, u32) {
        self.cells()
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }

    /// Renders the pattern centered on an otherwise empty grid
    ///
    /// `alive_threshold` only matters for [`LifePattern::Random`].
    pub fn build(&self, size: GridSize, alive_threshold: f32) -> Generation {
        match self {
            LifePattern::Random => seed_generation(size, alive_threshold),
            LifePattern::Clear => Generation::new(size),
            _ => {
                let (w, h) = self.extent();
                let origin_x = size.width().saturating_sub(w) / 2;
                let origin_y = size.height().saturating_sub(h) / 2;
                let mut generation = Generation::new(size);
                stamp(&mut generation, self.cells(), origin_x, origin_y);
                generation
            }
        }
    }
}

impl FromStr for LifePattern {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace(['-', '_', ' '], "");
        LifePattern::ALL
            .into_iter()
            .find(|p| p.as_str().to_ascii_lowercase().replace(' ', "") == wanted)
            .ok_or_else(|| LifeError::InvalidConfig(format!("unknown pattern '{s}'")))
    }
}

/// Sets `cells` alive at `origin`; anything landing outside the grid is skipped
pub fn stamp(generation: &mut Generation, cells: &[(u32, u32)], origin_x: u32, origin_y: u32) {
    for &(dx, dy) in cells {
        if let (Some(x), Some(y)) = (origin_x.checked_add(dx), origin_y.checked_add(dy)) {
            generation.set(x, y, true);
        }
    }
}

/// Host mirror of the `init` compute entry point
///
/// Cell `(x, y)` is alive iff `random_float(y * width + x) > alive_threshold`.
pub fn seed_generation(size: GridSize, alive_threshold: f32) -> Generation {
    let mut generation = Generation::new(size);
    for y in 0..size.height() {
        for x in 0..size.width() {
            let seed = size.linear_index(x, y);
            generation.set(x, y, random_float(seed) > alive_threshold);
        }
    }
    generation
}
